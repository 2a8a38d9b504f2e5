pub mod inverter_info;
pub mod inverter_list;
pub mod login;
pub mod station_detail;
pub mod station_list;
