use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::{Table, Value};

use bazaar_config::Error;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_table() -> Table {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn section<'a>(root: &'a mut Table, path: &[&str]) -> &'a mut Table {
	let mut table = root;

	for key in path {
		table = table
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	table
}

fn render(table: &Table) -> String {
	toml::to_string(table).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("bazaar_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> bazaar_config::Result<bazaar_config::Config> {
	let path = write_temp_config(payload);
	let result = bazaar_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn expect_validation(payload: String, expected: &str) {
	let err = load_payload(payload).expect_err("Expected validation error.");

	assert!(matches!(err, Error::Validation { .. }), "Unexpected error kind: {err:?}");

	let message = err.to_string();

	assert!(message.contains(expected), "Unexpected error message: {message}");
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = load_payload(render(&sample_table())).expect("Sample config must load.");

	assert!(cfg.providers.ranking.api_key.is_none());
	assert!(cfg.providers.returns.api_key.is_none());
	assert_eq!(cfg.providers.returns.api_base, "http://localhost:3001");
	assert_eq!(cfg.providers.ranking.timeout_ms, 10_000);
	assert_eq!(cfg.cdn.probe_timeout_ms, 5_000);
	assert_eq!(cfg.cdn.batch_timeout_ms, 10_000);
	assert_eq!(cfg.cdn.default_image_path, "/images/products/default/1_256.jpg");
	assert!(cfg.catalog.fallback_catalog_ids.is_none());
	assert!(cfg.product.absorb_store_errors);
	assert_eq!(cfg.product.synthetic_seed, None);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let mut table = sample_table();

	table.remove("cdn");
	table.remove("catalog");
	table.remove("product");

	let cfg = load_payload(render(&table)).expect("Config without optional sections must load.");

	assert_eq!(cfg.cdn.base_url, "https://images.meesho.com");
	assert_eq!((cfg.cdn.gallery_first_slot, cfg.cdn.gallery_last_slot), (2, 5));
	assert!(!cfg.cdn.cancel_pending_probes);
	assert_eq!(cfg.catalog.min_catalog_id_len, 4);
	assert_eq!(cfg.catalog.max_catalog_id_len, 20);
	assert_eq!(cfg.catalog.currency_symbol, "₹");
	assert_eq!(cfg.product.similar_limit, 6);
}

#[test]
fn blank_fallback_ids_normalize_to_none() {
	let mut table = sample_table();

	section(&mut table, &["catalog"]).insert(
		"fallback_catalog_ids".to_string(),
		Value::Array(vec![Value::String("  ".to_string()), Value::String(String::new())]),
	);

	let cfg = load_payload(render(&table)).expect("Config must load.");

	assert!(cfg.catalog.fallback_catalog_ids.is_none());
}

#[test]
fn fallback_ids_are_trimmed() {
	let mut table = sample_table();

	section(&mut table, &["catalog"]).insert(
		"fallback_catalog_ids".to_string(),
		Value::Array(vec![
			Value::String(" 1119458 ".to_string()),
			Value::String(String::new()),
			Value::String("3461848".to_string()),
		]),
	);

	let cfg = load_payload(render(&table)).expect("Config must load.");

	assert_eq!(
		cfg.catalog.fallback_catalog_ids,
		Some(vec!["1119458".to_string(), "3461848".to_string()])
	);
}

#[test]
fn probe_timeout_must_be_positive() {
	let mut table = sample_table();

	section(&mut table, &["cdn"]).insert("probe_timeout_ms".to_string(), Value::Integer(0));

	expect_validation(render(&table), "cdn.probe_timeout_ms must be greater than zero.");
}

#[test]
fn ranking_timeout_must_be_positive() {
	let mut table = sample_table();

	section(&mut table, &["providers", "ranking"])
		.insert("timeout_ms".to_string(), Value::Integer(0));

	expect_validation(render(&table), "providers.ranking.timeout_ms must be greater than zero.");
}

#[test]
fn gallery_slots_must_be_ordered() {
	let mut table = sample_table();
	let cdn = section(&mut table, &["cdn"]);

	cdn.insert("gallery_first_slot".to_string(), Value::Integer(6));
	cdn.insert("gallery_last_slot".to_string(), Value::Integer(3));

	expect_validation(
		render(&table),
		"cdn.gallery_first_slot must not exceed cdn.gallery_last_slot.",
	);
}

#[test]
fn catalog_id_length_bounds_must_be_ordered() {
	let mut table = sample_table();

	section(&mut table, &["catalog"]).insert("min_catalog_id_len".to_string(), Value::Integer(30));

	expect_validation(
		render(&table),
		"catalog.min_catalog_id_len must not exceed catalog.max_catalog_id_len.",
	);
}

#[test]
fn api_base_must_be_http_url() {
	let mut table = sample_table();

	section(&mut table, &["providers", "returns"])
		.insert("api_base".to_string(), Value::String("localhost:3001".to_string()));

	expect_validation(render(&table), "providers.returns.api_base must be an http or https URL.");
}

#[test]
fn default_header_values_must_be_strings() {
	let mut table = sample_table();
	let mut headers = Table::new();

	headers.insert("X-Retry".to_string(), Value::Integer(3));
	section(&mut table, &["providers", "ranking"])
		.insert("default_headers".to_string(), Value::Table(headers));

	expect_validation(render(&table), "providers.ranking.default_headers values must be strings.");
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("bazaar_config_test_missing_file.toml");

	let err = bazaar_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error kind: {err:?}");
}

#[test]
fn gallery_cannot_claim_the_main_image_slot() {
	let mut table = sample_table();

	section(&mut table, &["cdn"]).insert("gallery_first_slot".to_string(), Value::Integer(1));

	expect_validation(render(&table), "cdn.gallery_first_slot must be 2 or greater.");
}
