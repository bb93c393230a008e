use std::cell::RefCell;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::endpoint::origin;
use crate::error::{ClientError, Result};
use crate::transport::{send_checked, HttpRequest, Transport};

/// Where the category list lives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    /// `{base}/categories`
    #[default]
    BaseRelative,
    /// `{origin}/api/categories`
    OriginApi,
}

impl CategorySource {
    pub fn url(&self, base: &str) -> String {
        match self {
            CategorySource::BaseRelative => format!("{}/categories", base),
            CategorySource::OriginApi => format!("{}/api/categories", origin(base)),
        }
    }
}

/// The three category dropdowns on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectPurpose {
    Filter,
    Add,
    Edit,
}

impl SelectPurpose {
    pub const ALL: [SelectPurpose; 3] = [SelectPurpose::Filter, SelectPurpose::Add, SelectPurpose::Edit];

    pub fn sentinel_label(&self) -> &'static str {
        match self {
            SelectPurpose::Filter => "All Categories",
            SelectPurpose::Add | SelectPurpose::Edit => "Select Category",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    fn sentinel(purpose: SelectPurpose) -> Self {
        SelectOption {
            value: String::new(),
            label: purpose.sentinel_label().to_owned(),
            selected: false,
        }
    }
}

/// Category snapshot shared by every dropdown until the next page load.
#[derive(Debug, Default)]
pub struct CatalogCache {
    categories: RefCell<Vec<String>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        CatalogCache::default()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.categories.borrow().clone()
    }

    pub fn replace(&self, categories: Vec<String>) {
        *self.categories.borrow_mut() = categories;
    }

    /// Just the "unselected" entry, what a control shows while the list is loading.
    pub fn sentinel_only(purpose: SelectPurpose) -> Vec<SelectOption> {
        vec![SelectOption::sentinel(purpose)]
    }

    /// Sentinel first, then the cached categories in server order. The option
    /// equal to `selected` (ignoring case) is marked selected.
    pub fn options(&self, purpose: SelectPurpose, selected: Option<&str>) -> Vec<SelectOption> {
        let selected = selected.map(str::to_lowercase);
        let categories = self.categories.borrow();

        let mut options = Vec::with_capacity(categories.len() + 1);
        options.push(SelectOption::sentinel(purpose));
        options.extend(categories.iter().map(|category| SelectOption {
            value: category.clone(),
            label: category.clone(),
            selected: selected.as_deref() == Some(category.to_lowercase().as_str()),
        }));
        options
    }

    /// Fetches the listing without touching the cache.
    pub async fn fetch<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<Vec<String>> {
        let response = send_checked(transport, HttpRequest::get(url)).await?;
        let categories = parse_categories(&response.body)?;
        debug!("fetched {} categories", categories.len());
        Ok(categories)
    }
}

pub fn parse_categories(body: &str) -> Result<Vec<String>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(category) => Ok(category),
                other => Err(ClientError::Malformed(format!("category is not a string: {}", other))),
            })
            .collect(),
        other => Err(ClientError::Malformed(format!("expected a list of categories, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_snapshot_order() {
        let catalog = CatalogCache::new();
        catalog.replace(vec!["Rust".into(), "Travel".into()]);

        let labels: Vec<String> = catalog
            .options(SelectPurpose::Filter, None)
            .into_iter()
            .map(|option| option.label)
            .collect();
        assert_eq!(labels, vec!["All Categories", "Rust", "Travel"]);

        let add = catalog.options(SelectPurpose::Add, None);
        assert_eq!(add[0].label, "Select Category");
        assert_eq!(add[0].value, "");
        assert_eq!(&add[1..], &catalog.options(SelectPurpose::Edit, None)[1..]);
    }

    #[test]
    fn edit_selection_ignores_case() {
        let catalog = CatalogCache::new();
        catalog.replace(vec!["Rust".into(), "Travel".into()]);

        let selected: Vec<String> = catalog
            .options(SelectPurpose::Edit, Some("tRAVEL"))
            .into_iter()
            .filter(|option| option.selected)
            .map(|option| option.value)
            .collect();
        assert_eq!(selected, vec!["Travel"]);

        let none_selected = catalog
            .options(SelectPurpose::Edit, Some("Cooking"))
            .iter()
            .all(|option| !option.selected);
        assert!(none_selected);
    }

    #[test]
    fn non_list_is_malformed() {
        assert!(matches!(
            parse_categories(r#"{"categories": ["a"]}"#),
            Err(ClientError::Malformed(_))
        ));
        assert!(matches!(parse_categories(r#"["a", 3]"#), Err(ClientError::Malformed(_))));
        assert_eq!(parse_categories(r#"["a","b"]"#).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn source_urls() {
        let base = "http://localhost:5021/api/v1";
        assert_eq!(
            CategorySource::BaseRelative.url(base),
            "http://localhost:5021/api/v1/categories"
        );
        assert_eq!(
            CategorySource::OriginApi.url(base),
            "http://localhost:5021/api/categories"
        );
    }
}
