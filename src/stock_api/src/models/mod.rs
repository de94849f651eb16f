pub mod daily;
pub mod intraday;
pub mod request_params;
pub mod symbol;
