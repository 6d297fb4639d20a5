pub mod csv_adapter;
pub mod file_config_adapter;
pub mod sim_broker;
