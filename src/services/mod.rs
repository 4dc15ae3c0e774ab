pub mod irradiance_table;
pub mod panel_sizer;
pub mod sizing_service;
pub mod waffle_tiler;
