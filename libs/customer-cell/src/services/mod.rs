pub mod citas;
pub mod clients;
pub mod profile;
