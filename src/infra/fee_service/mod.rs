mod client;

pub use client::HttpFeeApi;
