pub mod tax_rate_controller;
