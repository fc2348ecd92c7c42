use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Brave,
    Arc,
    Helium,
    Vivaldi,
    Opera,
    Chromium,
    Waterfox,
}

impl BrowserKind {
    pub fn canonical_name(self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
            BrowserKind::Safari => "safari",
            BrowserKind::Edge => "edge",
            BrowserKind::Brave => "brave",
            BrowserKind::Arc => "arc",
            BrowserKind::Helium => "helium",
            BrowserKind::Vivaldi => "vivaldi",
            BrowserKind::Opera => "opera",
            BrowserKind::Chromium => "chromium",
            BrowserKind::Waterfox => "waterfox",
        }
    }
}

/// How a browser selects profiles on its command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrowserFamily {
    Chromium,
    Firefox,
    /// No profile switching from the command line.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KnownBrowser {
    pub kind: BrowserKind,
    pub bundle_id: &'static str,
    pub app_name: &'static str,
    pub family: BrowserFamily,
    /// Relative to `~/Library/Application Support`; empty when unused.
    pub config_dir: &'static str,
}

const fn known(
    kind: BrowserKind,
    bundle_id: &'static str,
    app_name: &'static str,
    family: BrowserFamily,
    config_dir: &'static str,
) -> KnownBrowser {
    KnownBrowser {
        kind,
        bundle_id,
        app_name,
        family,
        config_dir,
    }
}

static KNOWN_BROWSERS: &[KnownBrowser] = &[
    known(
        BrowserKind::Chrome,
        "com.google.Chrome",
        "Google Chrome",
        BrowserFamily::Chromium,
        "Google/Chrome",
    ),
    known(
        BrowserKind::Chrome,
        "com.google.Chrome.beta",
        "Google Chrome Beta",
        BrowserFamily::Chromium,
        "Google/Chrome Beta",
    ),
    known(
        BrowserKind::Chrome,
        "com.google.Chrome.dev",
        "Google Chrome Dev",
        BrowserFamily::Chromium,
        "Google/Chrome Dev",
    ),
    known(
        BrowserKind::Chrome,
        "com.google.Chrome.canary",
        "Google Chrome Canary",
        BrowserFamily::Chromium,
        "Google/Chrome Canary",
    ),
    known(
        BrowserKind::Edge,
        "com.microsoft.edgemac",
        "Microsoft Edge",
        BrowserFamily::Chromium,
        "Microsoft Edge",
    ),
    known(
        BrowserKind::Edge,
        "com.microsoft.edgemac.Beta",
        "Microsoft Edge Beta",
        BrowserFamily::Chromium,
        "Microsoft Edge Beta",
    ),
    known(
        BrowserKind::Edge,
        "com.microsoft.edgemac.Dev",
        "Microsoft Edge Dev",
        BrowserFamily::Chromium,
        "Microsoft Edge Dev",
    ),
    known(
        BrowserKind::Brave,
        "com.brave.Browser",
        "Brave Browser",
        BrowserFamily::Chromium,
        "BraveSoftware/Brave-Browser",
    ),
    known(
        BrowserKind::Brave,
        "com.brave.Browser.beta",
        "Brave Browser Beta",
        BrowserFamily::Chromium,
        "BraveSoftware/Brave-Browser-Beta",
    ),
    known(
        BrowserKind::Brave,
        "com.brave.Browser.nightly",
        "Brave Browser Nightly",
        BrowserFamily::Chromium,
        "BraveSoftware/Brave-Browser-Nightly",
    ),
    known(
        BrowserKind::Vivaldi,
        "com.vivaldi.Vivaldi",
        "Vivaldi",
        BrowserFamily::Chromium,
        "Vivaldi",
    ),
    known(
        BrowserKind::Arc,
        "company.thebrowser.Browser",
        "Arc",
        BrowserFamily::Chromium,
        "Arc/User Data",
    ),
    known(
        BrowserKind::Helium,
        "net.imput.helium",
        "Helium",
        BrowserFamily::Chromium,
        "net.imput.helium",
    ),
    known(
        BrowserKind::Opera,
        "com.operasoftware.Opera",
        "Opera",
        BrowserFamily::Chromium,
        "com.operasoftware.Opera",
    ),
    known(
        BrowserKind::Chromium,
        "org.chromium.Chromium",
        "Chromium",
        BrowserFamily::Chromium,
        "Chromium",
    ),
    known(BrowserKind::Firefox, "org.mozilla.firefox", "Firefox", BrowserFamily::Firefox, ""),
    known(
        BrowserKind::Firefox,
        "org.mozilla.firefoxdeveloperedition",
        "Firefox Developer Edition",
        BrowserFamily::Firefox,
        "",
    ),
    known(
        BrowserKind::Firefox,
        "org.mozilla.nightly",
        "Firefox Nightly",
        BrowserFamily::Firefox,
        "",
    ),
    known(BrowserKind::Waterfox, "net.waterfox.waterfox", "Waterfox", BrowserFamily::Firefox, ""),
    known(BrowserKind::Safari, "com.apple.Safari", "Safari", BrowserFamily::Other, ""),
];

/// Look a browser up by bundle id or application name.
pub fn find_known_browser(identifier: &str) -> Option<&'static KnownBrowser> {
    KNOWN_BROWSERS
        .iter()
        .find(|browser| browser.bundle_id == identifier || browser.app_name == identifier)
}
