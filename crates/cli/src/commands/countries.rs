//! Country directory command.

use market_storefront::dom::ids;
use market_storefront::page::render_countries;
use market_storefront::{Directory, Document, HttpBackend, NavigationLog, StorefrontConfig};

use super::CommandError;

/// Load the directory. With `open`, click that country's card and print
/// where it navigates; with `html`, print the whole page.
pub async fn run(
    config: &StorefrontConfig,
    open: Option<&str>,
    html: bool,
) -> Result<String, CommandError> {
    let document = Document::directory();
    let directory = Directory::new(
        HttpBackend::from_config(config),
        NavigationLog::new(),
        &document,
        config.placeholder_image.clone(),
    )?;
    directory.load_countries().await;
    ensure_loaded(&document)?;

    if let Some(country_id) = open {
        if !directory.click_card(country_id) {
            return Err(CommandError::UnknownCountry(country_id.to_string()));
        }
        return Ok(directory.navigator().last().unwrap_or_default());
    }

    if html {
        return Ok(render_countries(&document, "Choose your country")?);
    }

    Ok(directory
        .entries()
        .iter()
        .map(|entry| format!("{}\t{}\t{}", entry.id, entry.name, entry.redirect_url))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Fail with the grid's static error when the countries did not load.
fn ensure_loaded(document: &Document) -> Result<(), CommandError> {
    let grid = document.require(ids::COUNTRIES_GRID)?;
    if grid.select(|node| node.has_class("error")).is_empty() {
        Ok(())
    } else {
        Err(CommandError::Rejected(grid.text_content()))
    }
}
