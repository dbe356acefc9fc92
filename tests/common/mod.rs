//! Common Test Utilities
//!
//! Fixture builders and dataset writers shared by the unit and integration
//! test targets.

#![allow(dead_code)]

use chrono::NaiveDate;
use std::path::Path;
use tls_stats::config::{
    AppConfig, CacheConfig, PathsConfig, ProcessingConfig, RunContext, SourcesConfig,
};
use tls_stats::types::{CapabilityProfile, StatisticsReport, UsageRecord};

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Usage record dated 2024-01-01
pub fn usage(family: &str, version: &str, weight: u64) -> UsageRecord {
    UsageRecord::new(ymd(2024, 1, 1), family, version, weight)
}

/// Capability profile builder
pub struct ProfileBuilder {
    profile: CapabilityProfile,
}

impl ProfileBuilder {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            profile: CapabilityProfile {
                device_name: name.to_string(),
                platform: String::new(),
                version: version.to_string(),
                lowest_protocol: 0x0303,
                highest_protocol: 0x0303,
                cipher_suite_ids: Vec::new(),
                cipher_suite_names: Vec::new(),
                curve_ids: Vec::new(),
            },
        }
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.profile.platform = platform.to_string();
        self
    }

    pub fn protocols(mut self, lowest: u32, highest: u32) -> Self {
        self.profile.lowest_protocol = lowest;
        self.profile.highest_protocol = highest;
        self
    }

    pub fn suite(mut self, id: u32, name: &str) -> Self {
        self.profile.cipher_suite_ids.push(id);
        self.profile.cipher_suite_names.push(name.to_string());
        self
    }

    pub fn curves(mut self, curves: &[u32]) -> Self {
        self.profile.curve_ids = curves.to_vec();
        self
    }

    pub fn build(self) -> CapabilityProfile {
        self.profile
    }
}

pub fn profile(name: &str, version: &str) -> ProfileBuilder {
    ProfileBuilder::new(name, version)
}

/// Empty report generated on `date`
pub fn empty_report(date: NaiveDate) -> StatisticsReport {
    StatisticsReport {
        generation_date: date,
        start_date: date,
        end_date: date,
        protocols: Vec::new(),
        ciphers: Vec::new(),
        curves: Vec::new(),
    }
}

/// Configuration rooted at `home` with built-in defaults elsewhere
pub fn test_config(home: &Path) -> AppConfig {
    AppConfig {
        paths: PathsConfig {
            home: home.to_path_buf(),
        },
        sources: SourcesConfig::default(),
        cache: CacheConfig::default(),
        processing: ProcessingConfig::default(),
    }
}

pub fn test_context(home: &Path, today: NaiveDate) -> RunContext {
    let ctx = RunContext::new(&test_config(home), today);
    ctx.ensure_dirs().unwrap();
    ctx
}

/// One usage TSV line in dataset column order
pub fn usage_line(date: &str, os: &str, browser: &str, major: &str, count: u64) -> String {
    format!("{}\t{}\t-\t{}\t{}\t{}", date, os, browser, major, count)
}

pub fn write_usage_tsv(path: &Path, lines: &[String]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).unwrap();
}

pub fn write_capabilities_json(path: &Path, profiles: &[CapabilityProfile]) {
    std::fs::write(path, serde_json::to_vec_pretty(profiles).unwrap()).unwrap();
}

/// Small but realistic pair of datasets for `ctx`: Chrome desktop and mobile
/// share one profile, Firefox has its own, and one browser is not profiled
pub fn write_sample_datasets(ctx: &RunContext) {
    write_usage_tsv(
        &ctx.usage_file,
        &[
            usage_line("2024-04-01", "Windows", "Chrome", "85", 600),
            usage_line("2024-04-01", "Android", "Chrome Mobile", "87", 300),
            usage_line("2024-04-01", "Linux", "Firefox", "75", 100),
            usage_line("2024-04-01", "Windows", "Yandex Browser", "23", 50),
            usage_line("2024-05-01", "Windows", "Chrome", "85", 0),
            "not\ta\tusage\tline".to_string(),
        ],
    );

    write_capabilities_json(
        &ctx.capability_file,
        &[
            profile("Chrome", "80")
                .platform("Win 10")
                .protocols(0x0301, 0x0304)
                .suite(0x1301, "TLS_AES_128_GCM_SHA256")
                .suite(0xc02f, "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256")
                .curves(&[29, 23])
                .build(),
            profile("Firefox", "73")
                .platform("Win 10")
                .protocols(0x0303, 0x0304)
                .suite(0x1301, "TLS_AES_128_GCM_SHA256")
                .curves(&[29])
                .build(),
        ],
    );
}
