use reqwest::header::USER_AGENT;

use bazaar_config::Cdn;

use crate::Result;

pub fn product_image_url(base_url: &str, id: &str, slot: u32) -> String {
	format!("{base_url}/images/products/{id}/{slot}_256.jpg")
}

pub fn default_image_url(cfg: &Cdn) -> String {
	format!("{}{}", cfg.base_url, cfg.default_image_path)
}

/// Issues a HEAD request against `url`. Any 2xx status means the image exists.
pub async fn image_exists(cfg: &Cdn, url: &str) -> Result<bool> {
	let client = crate::client(cfg.probe_timeout_ms)?;
	let res = client.head(url).header(USER_AGENT, cfg.user_agent.as_str()).send().await?;
	let exists = res.status().is_success();

	tracing::debug!(url, status = %res.status(), exists, "Image probe finished.");

	Ok(exists)
}
