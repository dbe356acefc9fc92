pub mod refresh_policy;
