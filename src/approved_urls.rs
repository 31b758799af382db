//! Static registry of Defang URLs that blog content is allowed to link to.
//!
//! Everything here is `const` data; there is no way to mutate the registry at runtime.

use once_cell::sync::Lazy;
use url::Url;

pub const DOCS_ROOT: &str = "https://docs.defang.io";

pub const APPROVED_DEFANG_URLS: &[&str] = &[
    // General
    "https://portal.defang.io",
    "https://docs.defang.io",
    "https://defang.io/samples",
    "https://s.defang.io/discord",
    "https://github.com/DefangLabs",
    "https://defang.io/pricing",
    "https://defang.io",
    // Getting started
    "https://docs.defang.io/docs/intro/getting-started",
    "https://docs.defang.io/docs/concepts/authentication",
    // Concepts
    "https://docs.defang.io/docs/concepts/compose",
    "https://docs.defang.io/docs/concepts/services",
    "https://docs.defang.io/docs/concepts/deployments",
    "https://docs.defang.io/docs/concepts/configuration",
    "https://docs.defang.io/docs/concepts/domains",
    "https://docs.defang.io/docs/concepts/networking",
    "https://docs.defang.io/docs/concepts/ai-tracing/overview",
    "https://docs.defang.io/docs/concepts/security",
    "https://docs.defang.io/docs/concepts/debug",
    "https://docs.defang.io/docs/concepts/defang-byoc",
    "https://docs.defang.io/docs/concepts/pulumi",
    "https://docs.defang.io/docs/concepts/generate",
    "https://docs.defang.io/docs/concepts/scaling",
    "https://docs.defang.io/docs/concepts/local-development",
    // Providers
    "https://docs.defang.io/docs/providers/aws",
    "https://docs.defang.io/docs/providers/gcp",
    // Managed storage
    "https://docs.defang.io/docs/concepts/managed-storage/managed-postgres",
    "https://docs.defang.io/docs/concepts/managed-storage/managed-redis",
    "https://docs.defang.io/docs/concepts/managed-storage/managed-mongodb",
    "https://docs.defang.io/docs/concepts/managed-storage/managed-object-storage",
    // Managed LLMs
    "https://docs.defang.io/docs/concepts/managed-llms/managed-language-models",
    // Tutorials
    "https://docs.defang.io/docs/tutorials/deploy-to-aws",
    "https://docs.defang.io/docs/tutorials/deploy-to-gcp",
    "https://docs.defang.io/docs/tutorials/use-your-own-domain-name",
    "https://docs.defang.io/docs/tutorials/deploying-from-github-actions",
    "https://docs.defang.io/docs/tutorials/deploy-using-pulumi",
    "https://docs.defang.io/docs/tutorials/generate-new-code-using-ai",
    "https://docs.defang.io/docs/tutorials/configure-environment-variables",
    "https://docs.defang.io/docs/tutorials/deploy-container-using-the-cli",
    "https://docs.defang.io/docs/tutorials/monitoring-your-services",
    "https://docs.defang.io/docs/tutorials/scaling-your-services",
    "https://docs.defang.io/docs/tutorials/migrating-from-heroku",
    "https://docs.defang.io/docs/tutorials/deploy-openai-apps",
    "https://docs.defang.io/docs/tutorials/deploy-with-gpu",
    "https://docs.defang.io/docs/tutorials/deploying-with-the-defang-mcp-server",
    // CLI reference
    "https://docs.defang.io/docs/cli",
    "https://docs.defang.io/docs/cli/defang_compose_up",
    "https://docs.defang.io/docs/cli/defang_compose_down",
    "https://docs.defang.io/docs/cli/defang_config",
    "https://docs.defang.io/docs/cli/defang_generate",
    "https://docs.defang.io/docs/cli/defang_login",
    "https://docs.defang.io/docs/cli/defang_logs",
];

/// Hosts (optionally with a path prefix) that belong to Defang.
pub const DEFANG_DOMAINS: &[&str] = &[
    "defang.io",
    "docs.defang.io",
    "portal.defang.io",
    "s.defang.io",
    "github.com/DefangLabs",
    "github.com/defang-io",
];

/// Ordered: the first pattern found in the lowercased URL wins.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("playground", "https://docs.defang.io/docs/providers/aws"),
    ("digitalocean", "https://docs.defang.io/docs/providers/gcp"),
    ("azure", "https://docs.defang.io/docs/providers/aws"),
    (
        "postgres",
        "https://docs.defang.io/docs/concepts/managed-storage/managed-postgres",
    ),
    (
        "redis",
        "https://docs.defang.io/docs/concepts/managed-storage/managed-redis",
    ),
    (
        "mongodb",
        "https://docs.defang.io/docs/concepts/managed-storage/managed-mongodb",
    ),
];

/// Hosts whose first path segment names an account and is case-insensitive.
const ACCOUNT_HOSTS: &[&str] = &["github.com"];

/// Approved entries in normalized form, paired with whether each is a site root.
static NORMALIZED_APPROVED: Lazy<Vec<(String, bool)>> = Lazy::new(|| {
    APPROVED_DEFANG_URLS
        .iter()
        .filter_map(|entry| normalize(entry).map(|normalized| (normalized, is_root_entry(entry))))
        .collect()
});

/// Reduces a URL to `scheme://host[:port]/path` without query, fragment, or a
/// trailing slash. On account hosts the account segment is lowercased.
fn normalize(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let authority = match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let path = if ACCOUNT_HOSTS.contains(&host) {
        let rest = parsed.path().trim_start_matches('/');
        match rest.split_once('/') {
            Some((account, tail)) => format!("/{}/{}", account.to_lowercase(), tail),
            None => format!("/{}", rest.to_lowercase()),
        }
    } else {
        parsed.path().to_string()
    };

    let normalized = format!("{}://{}{}", parsed.scheme(), authority, path);
    Some(match normalized.strip_suffix('/') {
        Some(stripped) => stripped.to_string(),
        None => normalized,
    })
}

/// Whether an approved entry points at a site root rather than a page.
fn is_root_entry(entry: &str) -> bool {
    entry
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.contains('/'))
}

/// Returns true if the URL is on the approved list, or lives underneath an approved
/// page. Site roots only match exactly, so `https://docs.defang.io/random-page` is not
/// approved just because `https://docs.defang.io` is.
pub fn is_approved_url(url: &str) -> bool {
    let Some(normalized) = normalize(url) else {
        return false;
    };

    NORMALIZED_APPROVED.iter().any(|(approved, is_root)| {
        if normalized == *approved {
            return true;
        }
        !is_root
            && normalized
                .strip_prefix(approved.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Returns true if the URL's host is, or is a subdomain of, a Defang domain.
pub fn is_brand_domain(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    let path = parsed.path().to_lowercase();

    DEFANG_DOMAINS.iter().any(|entry| {
        let (domain, prefix) = match entry.split_once('/') {
            Some((domain, prefix)) => (domain, Some(prefix.to_lowercase())),
            None => (*entry, None),
        };

        let host_matches = host == domain || host.ends_with(&format!(".{}", domain));
        match prefix {
            None => host_matches,
            Some(prefix) => {
                host_matches
                    && path
                        .trim_start_matches('/')
                        .split('/')
                        .next()
                        .is_some_and(|first| first == prefix)
            }
        }
    })
}

/// Suggests an approved page to link to instead of `url`.
pub fn suggest_replacement(url: &str) -> Option<String> {
    let lower = url.to_lowercase();

    if let Some((_, suggestion)) = REPLACEMENTS
        .iter()
        .find(|(pattern, _)| lower.contains(*pattern))
    {
        return Some(suggestion.to_string());
    }

    if is_brand_domain(url) {
        return Some(DOCS_ROOT.to_string());
    }

    None
}
