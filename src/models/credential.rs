use serde::{Deserialize, Serialize};

/// 跨站策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// 规范化 sameSite 属性
///
/// - 缺失（null / 未定义）→ 删除该属性
/// - `no_restriction` → `None`
/// - 非标准值 → `Lax`
/// - 标准值保持不变
pub fn normalize_same_site(raw: Option<&str>) -> Option<SameSitePolicy> {
    let value = raw?;
    Some(match value {
        "no_restriction" => SameSitePolicy::None,
        "Strict" => SameSitePolicy::Strict,
        "Lax" => SameSitePolicy::Lax,
        "None" => SameSitePolicy::None,
        _ => SameSitePolicy::Lax,
    })
}

/// 浏览器插件导出的一条 cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCredential {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secure: Option<bool>,
    #[serde(default)]
    pub http_only: Option<bool>,
    #[serde(default)]
    pub same_site: Option<String>,
    #[serde(default, alias = "expires")]
    pub expiration_date: Option<f64>,
}

/// 规范化后的 cookie，可直接注入浏览器
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCredential {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub secure: Option<bool>,
    pub http_only: Option<bool>,
    pub same_site: Option<SameSitePolicy>,
    pub expires: Option<f64>,
}

impl SessionCredential {
    pub fn normalize(&self) -> NormalizedCredential {
        NormalizedCredential {
            name: self.name.clone(),
            value: self.value.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
            secure: self.secure,
            http_only: self.http_only,
            same_site: normalize_same_site(self.same_site.as_deref()),
            expires: self.expiration_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_same_site_table() {
        let cases: [(Option<&str>, Option<SameSitePolicy>); 6] = [
            (None, None),
            (Some("no_restriction"), Some(SameSitePolicy::None)),
            (Some("Strict"), Some(SameSitePolicy::Strict)),
            (Some("Lax"), Some(SameSitePolicy::Lax)),
            (Some("None"), Some(SameSitePolicy::None)),
            (Some("garbage"), Some(SameSitePolicy::Lax)),
        ];
        for (input, expected) in cases {
            assert_eq!(normalize_same_site(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_null_and_missing_same_site_are_removed() {
        let with_null: SessionCredential = serde_json::from_str(
            r#"{"name":"_tb_token_","value":"abc","domain":".taobao.com","sameSite":null}"#,
        )
        .unwrap();
        let missing: SessionCredential =
            serde_json::from_str(r#"{"name":"cookie2","value":"xyz","domain":".taobao.com"}"#)
                .unwrap();

        assert_eq!(with_null.normalize().same_site, None);
        assert_eq!(missing.normalize().same_site, None);
    }

    #[test]
    fn test_extension_export_fields() {
        let cred: SessionCredential = serde_json::from_str(
            r#"{
                "domain": ".taobao.com",
                "expirationDate": 1793000000.5,
                "hostOnly": false,
                "httpOnly": true,
                "name": "cookie2",
                "path": "/",
                "sameSite": "unspecified",
                "secure": true,
                "session": false,
                "storeId": "0",
                "value": "1f2e"
            }"#,
        )
        .unwrap();
        let normalized = cred.normalize();
        assert_eq!(normalized.http_only, Some(true));
        assert_eq!(normalized.expires, Some(1793000000.5));
        assert_eq!(normalized.same_site, Some(SameSitePolicy::Lax));
    }
}
