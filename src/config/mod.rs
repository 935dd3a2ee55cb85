//! Configuration module

mod site;

pub use site::CompanyConfig;
pub use site::ListingConfig;
pub use site::ListingSource;
pub use site::SiteConfig;
pub use site::API_URL_ENV;
