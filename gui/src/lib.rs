pub mod core {
    pub mod gui;
    pub mod painter;
}
pub mod interfaces {
    pub mod roadsim_interface;
}
