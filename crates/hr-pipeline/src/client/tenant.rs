/// Which tenant schema the server will route a host name to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantResolution {
    Tenant(String),
    Public,
}

impl TenantResolution {
    pub fn schema_name(&self) -> &str {
        match self {
            Self::Tenant(schema) => schema,
            Self::Public => "public",
        }
    }
}

/// Resolve a host name (port allowed) the same way the API's domain middleware does.
pub fn resolve_tenant(host: &str, base_domain: &str) -> TenantResolution {
    let hostname = host
        .split(':')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let base_domain = base_domain.trim().to_ascii_lowercase();

    if hostname == base_domain || hostname == "localhost" || hostname == "127.0.0.1" {
        return TenantResolution::Public;
    }

    for suffix in [format!(".{base_domain}"), ".localhost".to_string()] {
        if let Some(subdomain) = hostname.strip_suffix(suffix.as_str()) {
            if !subdomain.is_empty() {
                return TenantResolution::Tenant(subdomain.to_string());
            }
        }
    }

    if hostname.ends_with(".local") {
        if let Some(subdomain) = hostname.split('.').next().filter(|part| !part.is_empty()) {
            return TenantResolution::Tenant(subdomain.to_string());
        }
    }

    TenantResolution::Public
}

/// Host portion of an API base URL, if it parses.
pub fn host_of(base_url: &str) -> Option<String> {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomains_of_base_and_localhost_resolve_to_tenant() {
        assert_eq!(
            resolve_tenant("acme.copilothq.com", "copilothq.com"),
            TenantResolution::Tenant("acme".to_string())
        );
        assert_eq!(
            resolve_tenant("globex.localhost:8000", "copilothq.com"),
            TenantResolution::Tenant("globex".to_string())
        );
        assert_eq!(
            resolve_tenant("initech.local", "copilothq.com"),
            TenantResolution::Tenant("initech".to_string())
        );
    }

    #[test]
    fn bare_hosts_resolve_to_public() {
        for host in ["copilothq.com", "localhost:5173", "127.0.0.1", "example.org"] {
            assert_eq!(
                resolve_tenant(host, "copilothq.com"),
                TenantResolution::Public,
                "{host} should be public"
            );
        }
        assert_eq!(TenantResolution::Public.schema_name(), "public");
    }

    #[test]
    fn host_of_extracts_hostname() {
        assert_eq!(
            host_of("http://acme.localhost:8000/api").as_deref(),
            Some("acme.localhost")
        );
        assert_eq!(host_of("not a url"), None);
    }
}
