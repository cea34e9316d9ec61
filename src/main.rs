#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    realty_crm_lib::run();
}
