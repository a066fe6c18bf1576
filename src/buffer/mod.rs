pub mod fault_handler;
pub mod frame_table;
