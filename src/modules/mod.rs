pub mod provider_fingerprints;
pub mod scan_subdomain_takeover;
pub mod subdomain_reader;
