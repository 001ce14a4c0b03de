use helpers::general::{argsort, SortOrder};

/// RaceResult contains all race information that is required for post-processing the results.
#[derive(Debug, Clone)]
pub struct RaceResult {
    pub tot_no_laps: u32,
    pub laptimes: Vec<f64>,
    pub racetime: f64,
    pub finished: bool,
    pub seed: Option<u64>,
}

impl RaceResult {
    /// print_lap_and_race_times prints the resulting lap and race times to the console output.
    pub fn print_lap_and_race_times(&self) {
        println!("RESULT: Lap times");
        println!("{}", self.laptimes_table());

        println!("RESULT: Race time");
        if self.finished {
            println!("{:8.3}s", self.racetime);
        } else {
            println!(
                "{:8.3}s (not finished, {}/{} laps completed)",
                self.racetime,
                self.laptimes.len(),
                self.tot_no_laps
            );
        }
    }

    /// laptimes_table creates the lap/lap time/cumulated time table.
    pub fn laptimes_table(&self) -> String {
        let mut tmp_string = String::from("lap,  laptime, racetime\n");
        let mut racetime = 0.0;

        for (i, laptime) in self.laptimes.iter().enumerate() {
            racetime += laptime;
            tmp_string.push_str(&format!(
                "{:3}, {:7.3}s, {:7.3}s\n",
                i + 1,
                laptime,
                racetime
            ));
        }

        tmp_string
    }
}

/// print_race_time_stats prints the race times of multiple runs sorted from fastest to slowest,
/// followed by their mean. Unfinished runs are listed separately.
pub fn print_race_time_stats(race_results: &[RaceResult]) {
    let finished: Vec<&RaceResult> = race_results.iter().filter(|r| r.finished).collect();
    let racetimes: Vec<f64> = finished.iter().map(|r| r.racetime).collect();
    let idxs = argsort(&racetimes, SortOrder::Ascending);

    let mut tmp_string = String::from("rank, racetime, seed\n");
    for (rank, &idx) in idxs.iter().enumerate() {
        tmp_string.push_str(&format!(
            "{:4}, {:7.3}s, {}\n",
            rank + 1,
            racetimes[idx],
            finished[idx]
                .seed
                .map_or_else(|| String::from("-"), |s| s.to_string())
        ));
    }

    println!("RESULT: Race times of {} finished runs", finished.len());
    println!("{}", tmp_string);

    if !racetimes.is_empty() {
        println!(
            "RESULT: Mean race time {:.3}s",
            racetimes.iter().sum::<f64>() / racetimes.len() as f64
        );
    }

    let no_unfinished = race_results.len() - finished.len();
    if no_unfinished > 0 {
        println!("RESULT: {} runs did not finish", no_unfinished);
    }
}
