use taskflow_shared::{FILTER_ALL, TaskStatus};

/// 下拉筛选的取值："全部" 或某个具体值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }
}

impl Selection<String> {
    /// `"all"` 与空字符串都表示不过滤
    pub fn from_value(value: &str) -> Self {
        match value.trim() {
            "" | FILTER_ALL => Selection::All,
            other => Selection::Only(other.to_string()),
        }
    }

    pub fn as_value(&self) -> &str {
        match self {
            Selection::All => FILTER_ALL,
            Selection::Only(value) => value,
        }
    }

    pub fn matches_str(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }
}

impl Selection<TaskStatus> {
    /// 无法识别的状态名按 "全部" 处理
    pub fn from_value(value: &str) -> Self {
        TaskStatus::parse(value).map_or(Selection::All, Selection::Only)
    }

    pub fn as_value(&self) -> &'static str {
        match self {
            Selection::All => FILTER_ALL,
            Selection::Only(status) => status.as_str(),
        }
    }
}

/// 大小写不敏感的子串匹配；空的搜索词匹配一切
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// 任一字段包含搜索词即匹配
pub fn matches_any<'a>(needle: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    needle.trim().is_empty() || fields.into_iter().any(|field| contains_ci(field, needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_a_no_op() {
        assert!(Selection::<String>::from_value("all").matches_str("anything"));
        assert!(Selection::<TaskStatus>::from_value("all").matches(&TaskStatus::Done));
        assert_eq!(Selection::<String>::from_value("").as_value(), "all");
    }

    #[test]
    fn only_matches_exactly() {
        let area = Selection::<String>::from_value("2");
        assert!(area.matches_str("2"));
        assert!(!area.matches_str("22"));

        let status = Selection::<TaskStatus>::from_value("in_progress");
        assert_eq!(status, Selection::Only(TaskStatus::InProgress));
        assert!(!status.matches(&TaskStatus::Pending));
    }

    #[test]
    fn text_search_is_case_insensitive() {
        assert!(contains_ci("Revisar Planilla", "planilla"));
        assert!(contains_ci("Revisar", "  "));
        assert!(!contains_ci("Revisar", "bodega"));
        assert!(matches_any("ANA", ["x", "ana@x.com"]));
        assert!(!matches_any("zzz", Vec::<&str>::new()));
    }
}
