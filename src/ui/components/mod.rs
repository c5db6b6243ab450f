pub mod draw_panel;
pub mod history_list;
pub mod menu;
pub mod option_form;
pub mod option_list;
pub mod settings_panel;
