pub mod profiles;

pub use profiles::ProfileLookup;
