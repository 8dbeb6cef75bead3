//! 분류 카테고리.
//!
//! 카테고리 이름은 이미지 디렉토리 이름이자 JSON 로그 파일명의 일부이므로
//! 파일 시스템에서 안전한 문자열만 허용한다.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// 기본 카테고리 (순서 유지)
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Indolor", "Pouca dor", "Muita dor", "Incerto"];

/// 파일명에 쓸 수 없는 문자
const FORBIDDEN_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// 검증된 카테고리 이름
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// 이름 검증 후 생성
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Augmentation 하위 JSON 로그 파일명 (`Augmentation_<카테고리>.json`)
    pub fn log_file_name(&self) -> String {
        format!("Augmentation_{}.json", self.0)
    }
}

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.is_empty() {
        return Err(CoreError::validation("category", "빈 이름"));
    }
    if name == "." || name == ".." {
        return Err(CoreError::validation("category", format!("예약된 이름: {name}")));
    }
    if name.trim() != name {
        return Err(CoreError::validation(
            "category",
            format!("앞뒤 공백 불가: {name:?}"),
        ));
    }
    if let Some(c) = name
        .chars()
        .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control())
    {
        return Err(CoreError::validation(
            "category",
            format!("허용되지 않는 문자 {c:?}: {name}"),
        ));
    }
    Ok(())
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 설정에서 주입되는 순서 있는 카테고리 집합
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    /// 비어 있지 않고 중복 없는 카테고리 목록으로 생성
    pub fn new(categories: Vec<Category>) -> Result<Self, CoreError> {
        if categories.is_empty() {
            return Err(CoreError::validation("categories", "카테고리가 하나 이상 필요"));
        }
        for (i, category) in categories.iter().enumerate() {
            if categories[..i].contains(category) {
                return Err(CoreError::validation(
                    "categories",
                    format!("중복 카테고리: {category}"),
                ));
            }
        }
        Ok(Self { categories })
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, CoreError> {
        let categories = names
            .iter()
            .map(|n| Category::new(n.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(categories)
    }

    /// 기본 4개 카테고리
    pub fn defaults() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|n| Category((*n).to_string()))
                .collect(),
        }
    }

    /// 이름으로 카테고리 조회
    pub fn get(&self, name: &str) -> Result<&Category, CoreError> {
        self.categories
            .iter()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "Category".to_string(),
                id: name.to_string(),
            })
    }

    /// 이름 목록을 이 집합의 부분집합으로 해석
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Category>, CoreError> {
        names.iter().map(|n| self.get(n.as_ref()).cloned()).collect()
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Category> {
        self.categories.iter()
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepts_labels_with_spaces() {
        let category = Category::new("Pouca dor").unwrap();
        assert_eq!(category.as_str(), "Pouca dor");
        assert_eq!(category.log_file_name(), "Augmentation_Pouca dor.json");
    }

    #[test]
    fn rejects_unsafe_names() {
        for name in ["", "..", "a/b", "a\\b", " Indolor", "dor?", "x\ny"] {
            assert_matches!(
                Category::new(name),
                Err(CoreError::Validation { .. }),
                "{name:?} 는 거부되어야 함"
            );
        }
    }

    #[test]
    fn deserialize_validates() {
        let ok: Category = serde_json::from_str("\"Incerto\"").unwrap();
        assert_eq!(ok.as_str(), "Incerto");
        assert!(serde_json::from_str::<Category>("\"../etc\"").is_err());
    }

    #[test]
    fn defaults_keep_order() {
        let set = CategorySet::defaults();
        let names: Vec<&str> = set.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, DEFAULT_CATEGORIES);
    }

    #[test]
    fn set_rejects_empty_and_duplicates() {
        assert!(CategorySet::new(Vec::new()).is_err());
        assert!(CategorySet::from_names(&["A", "B", "A"]).is_err());
    }

    #[test]
    fn get_unknown_is_not_found() {
        let set = CategorySet::defaults();
        assert!(set.get("Muita dor").is_ok());
        assert_matches!(set.get("Dor extrema"), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn subset_resolves_names() {
        let set = CategorySet::defaults();
        let sub = set.subset(&["Incerto", "Indolor"]).unwrap();
        assert_eq!(sub.len(), 2);
        assert_eq!(sub[0].as_str(), "Incerto");
        assert!(set.subset(&["Nope"]).is_err());
    }
}
