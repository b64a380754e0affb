/// Section marker lines of the Qualys patch report, in document order.
/// Each must start a line; all but the host vulnerabilities marker must also
/// end it.
pub const PATCH_LIST_MARKER: &str = "Patch List,,,,,,,,";
pub const PATCHES_BY_HOST_MARKER: &str = "Patches by Host,,,,,,,,";
pub const HOST_VULNERABILITIES_MARKER: &str = "Host Vulnerabilities Fixed by Patch,,,,,,,,";
pub const PATCH_LINKS_MARKER: &str = "Patch Links.,,,,,,,,";

// Field names as they appear in the report headers (after key normalization)
pub const QID: &str = "QID";
pub const PATCH_QID: &str = "Patch QID";
pub const IP: &str = "IP";
pub const DNS: &str = "DNS";
pub const NETBIOS: &str = "NetBIOS";
pub const OS: &str = "OS";
pub const OS_CPE: &str = "OS CPE";
pub const VULNERABILITY_COUNT: &str = "Vulnerability Count";
pub const OS_SW: &str = "OS/SW";
pub const LINK: &str = "Link";
pub const VENDOR_ID: &str = "Vendor ID";
pub const SEVERITY: &str = "Severity";
pub const TITLE: &str = "Title";
pub const PUBLISHED: &str = "Published";

/// Separator used when collapsing several links for one QID into a single cell
pub const LINK_SEPARATOR: &str = ", ";

/// Default output column order. The trailing empty column is part of the
/// format downstream consumers expect.
pub const DEFAULT_OUTPUT_COLUMNS: [&str; 14] = [
    IP,
    DNS,
    NETBIOS,
    OS,
    OS_CPE,
    QID,
    TITLE,
    SEVERITY,
    PUBLISHED,
    VENDOR_ID,
    LINK,
    OS_SW,
    VULNERABILITY_COUNT,
    "",
];

/// Environment variable naming a config file when `--config` is not given
pub const CONFIG_ENV_VAR: &str = "PATCH_REPORT_CONFIG";

/// Get the default output columns as owned strings
pub fn default_output_columns() -> Vec<String> {
    DEFAULT_OUTPUT_COLUMNS.iter().map(|c| c.to_string()).collect()
}

// Section names used in logs and metrics
pub const PATCH_LIST_SECTION: &str = "patch_list";
pub const PATCHES_BY_HOST_SECTION: &str = "patches_by_host";
pub const HOST_VULNERABILITIES_SECTION: &str = "host_vulnerabilities";
pub const PATCH_LINKS_SECTION: &str = "patch_links";
pub const SECTIONS: [&str; 4] = [
    PATCH_LIST_SECTION,
    PATCHES_BY_HOST_SECTION,
    HOST_VULNERABILITIES_SECTION,
    PATCH_LINKS_SECTION,
];
pub const SECTION_MARKERS: [&str; 4] = [
    PATCH_LIST_MARKER,
    PATCHES_BY_HOST_MARKER,
    HOST_VULNERABILITIES_MARKER,
    PATCH_LINKS_MARKER,
];

// Join names used in logs and metrics
pub const LINK_JOIN: &str = "links";
pub const CATALOG_JOIN: &str = "catalog";
pub const JOINS: [&str; 2] = [LINK_JOIN, CATALOG_JOIN];
