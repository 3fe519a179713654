// src/gui/components/mod.rs
pub mod action_buttons;
pub mod lead_table;
pub mod log_panel;
pub mod search_form;
