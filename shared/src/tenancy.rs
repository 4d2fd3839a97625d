//! 主机名租户解析
//!
//! 每个分支(区域)有自己的子域名，主域名则可以访问所有区域的数据。
//! 纯函数、无副作用，可反复调用。

/// 多租户主域名
pub const PRIMARY_DOMAIN: &str = "evolutionsystem.sbs";

/// 默认映射表：主机名(或主机名前缀) -> 区域 ID
const DEFAULT_TENANTS: &[(&str, &str)] = &[
    ("evolutionsystem.sbs", "eedf2407cc75b66c"),
    ("www.evolutionsystem.sbs", "eedf2407cc75b66c"),
    ("jinotepe.", "5c8d2a1b-9e4f-4d6c-8a0b-1f2e3d4c5b6a"),
    ("nandaime.", "8a1b6a7e-4d5c-4f1a-9f23-3a8c5e6b7d41"),
    ("chontales.", "b90a4c28-568b-4b13-a4f6-82087a13c9e6"),
    ("chinandega.", "f3d9e0b1-2c8f-4a3d-8e7c-4a1b2c3d4e5f"),
];

/// 一次解析的结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomainInfo {
    pub area_id: Option<String>,
    pub is_main_domain: bool,
}

/// 主机名 -> 租户解析器
#[derive(Debug, Clone)]
pub struct DomainResolver {
    primary: String,
    entries: Vec<(String, String)>,
}

impl Default for DomainResolver {
    fn default() -> Self {
        Self::new(PRIMARY_DOMAIN, DEFAULT_TENANTS.iter().copied())
    }
}

fn normalize(hostname: &str) -> String {
    hostname.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn is_loopback(host: &str) -> bool {
    host.starts_with("localhost") || host == "127.0.0.1" || host == "::1" || host == "[::1]"
}

impl DomainResolver {
    pub fn new<K, V>(primary: &str, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            primary: normalize(primary),
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }

    /// 是否为主域名（含 `www.`），本地回环地址也视为主域名
    pub fn is_main_domain(&self, hostname: &str) -> bool {
        let host = normalize(hostname);
        host == self.primary
            || host.strip_prefix("www.") == Some(self.primary.as_str())
            || is_loopback(&host)
    }

    /// 解析主机名对应的区域 ID
    ///
    /// 本地回环视为主域名的别名。其他情况先精确匹配，再取最长的前缀匹配，
    /// 与映射表的顺序无关。
    pub fn area_id(&self, hostname: &str) -> Option<&str> {
        let host = normalize(hostname);
        if host.is_empty() {
            return None;
        }
        let host = if is_loopback(&host) {
            self.primary.clone()
        } else {
            host
        };

        if let Some((_, id)) = self.entries.iter().find(|(key, _)| *key == host) {
            return Some(id.as_str());
        }

        self.entries
            .iter()
            .filter(|(key, _)| host.starts_with(key.as_str()))
            .max_by_key(|(key, _)| key.len())
            .map(|(_, id)| id.as_str())
    }

    /// 一次性得到区域 ID 与主域名标记
    ///
    /// 没有浏览器位置信息时(`None`)，既没有区域也不是主域名。
    pub fn resolve(&self, hostname: Option<&str>) -> DomainInfo {
        match hostname {
            Some(host) => DomainInfo {
                area_id: self.area_id(host).map(str::to_string),
                is_main_domain: self.is_main_domain(host),
            },
            None => DomainInfo::default(),
        }
    }

    /// 列出租户主机名（排除主域名本身）
    pub fn tenant_hosts(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(key, _)| key.as_str())
            .filter(|key| !self.is_main_domain(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_primary_and_loopback_are_main() {
        let resolver = DomainResolver::default();
        for (host, _) in DEFAULT_TENANTS {
            let expected = *host == PRIMARY_DOMAIN || *host == "www.evolutionsystem.sbs";
            assert_eq!(resolver.is_main_domain(host), expected, "{host}");
        }
        assert!(resolver.is_main_domain("localhost"));
        assert!(resolver.is_main_domain("127.0.0.1"));
        assert!(!resolver.is_main_domain("nandaime.evolutionsystem.sbs"));
    }

    #[test]
    fn localhost_aliases_primary_tenant() {
        let resolver = DomainResolver::default();
        assert_eq!(
            resolver.area_id("localhost"),
            resolver.area_id("evolutionsystem.sbs")
        );
        assert_eq!(resolver.area_id("localhost"), Some("eedf2407cc75b66c"));
    }

    #[test]
    fn tenant_prefix_resolves() {
        let resolver = DomainResolver::default();
        assert_eq!(
            resolver.area_id("nandaime.example"),
            Some("8a1b6a7e-4d5c-4f1a-9f23-3a8c5e6b7d41")
        );
        assert_eq!(resolver.area_id("unknown.example"), None);
        assert_eq!(resolver.area_id(""), None);
    }

    #[test]
    fn longest_prefix_wins_regardless_of_order() {
        let resolver = DomainResolver::new(
            "main.test",
            [("north.", "generic"), ("north.sub.", "specific")],
        );
        assert_eq!(resolver.area_id("north.sub.example"), Some("specific"));
        assert_eq!(resolver.area_id("north.example"), Some("generic"));
    }

    #[test]
    fn resolve_without_location() {
        let info = DomainResolver::default().resolve(None);
        assert_eq!(info, DomainInfo::default());
    }

    #[test]
    fn tenant_hosts_exclude_primary() {
        let resolver = DomainResolver::default();
        let hosts = resolver.tenant_hosts();
        assert_eq!(hosts, vec!["jinotepe.", "nandaime.", "chontales.", "chinandega."]);
    }
}
