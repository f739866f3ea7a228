pub mod browser;
pub mod help_overlay;
pub mod log_panel;
pub mod now_playing;
pub mod speaker_list;
