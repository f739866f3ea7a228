pub mod pane_chrome;
pub mod progress_bar;
pub mod scrollable_list;
pub mod status_bar;
pub mod toast;
pub mod text;
