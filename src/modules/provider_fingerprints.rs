use once_cell::sync::Lazy;
use regex::bytes::Regex;

/// A hosting provider and the page it serves for a resource that no longer exists.
pub struct Provider {
    pub name: &'static str,
    pub fingerprint: Regex,
}

// Order matters: when several fingerprints match a body, the first one is reported.
const FINGERPRINTS: &[(&str, &str)] = &[
    ("Amazon S3", r"<Code>NoSuchBucket</Code>"),
    ("Heroku", r"There's nothing here."),
    ("GitHub Pages", r"There isn't a GitHub Pages site here."),
    ("GitLab Pages", r"<title>.* - GitLab Pages</title>"),
    ("Microsoft Azure", r"The resource you are looking for has been removed, had its name changed, or is temporarily unavailable."),
    ("Fastly", r"Fastly error: unknown domain:"),
    ("WordPress.com", r"Do you want to register .*"),
    ("Tilda", r"<title>.* – is this your website\?</title>"),
    ("Shopify", r"Sorry, this shop is currently unavailable."),
    ("Netlify", r"<title>Site Not Found</title>"),
    ("Pantheon", r"<title>.* is parked on Pantheon</title>"),
    ("Tumblr", r#"There's nothing here\. <a href="https://www.tumblr.com">Whatever you were looking for doesn't currently exist at this address\.</a>"#),
    ("Cloudflare", r"Error 1001 \| DNS resolution error"),
    ("Fly", r"404 Site .*fly.dev is not served on this interface"),
    ("Cargo", r"<title>404 Page Not Found \| Cargo</title>"),
    ("Unbounce", r"<title>.* - Unbounce</title>"),
    ("Surge", r"project not found"),
    ("Webflow", r"The page you are looking for doesn't exist or has been moved."),
    ("Read the Docs", r"This domain is not served by Read the Docs"),
    ("Hatena Blog", r"The page you were looking for doesn't exist \(404\)"),
    ("Help Scout", r"No settings were found for this company:"),
    ("Zendesk", r"Help Center Closed"),
    ("Kinsta", r"No Site For Domain"),
    ("Ghost", r"<title>Ghost \| Sign in</title>"),
    ("Acquia", r"Site not found · Acquia"),
    ("Big Cartel", r"This shop is not available"),
    ("Bitbucket", r"Repository not found"),
    ("Brightcove", r"The page you have requested has been removed or is temporarily unavailable."),
    ("Campaign Monitor", r"double-check that the domain is correctly configured"),
    ("Cargo Collective", r"You have reached a domain that is pending ICANN verification"),
    ("Desk", r"Please try again or try Desk.com free for 14 days"),
    ("Distil Networks", r"The requested URL was not found on this server."),
    ("Freshdesk", r"The page you're looking for is currently unavailable"),
    ("G Suite", r"Sorry, this page is not available"),
    ("Intercom", r"This page is no longer available"),
    ("Launchrock", r"It looks like you may have taken a wrong turn somewhere. Don't worry...it happens to all of us."),
    ("Mashery", r"Unrecognized domain"),
    ("StatusPage", r"You've Discovered A Missing Link"),
    ("Strikingly", r"Looks like you've accessed a page that doesn't exist"),
    ("Thinkific", r"You may have mistyped the address or the page may have moved"),
    ("Tictail", r"There's nothing here... yet"),
    ("Uptime Robot", r"This domain is no longer being monitored"),
    ("Uservoice", r"This UserVoice subdomain is currently available!"),
    ("Wishpond", r"This account has been deactivated"),
    ("Wix", r"Looks like this domain isn't connected to a website yet!"),
    ("Wordpress", r"Do you want to register this domain and start building your website?"),
    ("Worksites", r"Sorry, we couldn't find the page you're looking for"),
];

pub static KNOWN_PROVIDERS: Lazy<Vec<Provider>> = Lazy::new(|| {
    FINGERPRINTS
        .iter()
        .map(|&(name, pattern)| Provider {
            name,
            fingerprint: Regex::new(pattern).expect("provider fingerprints are valid regexes"),
        })
        .collect()
});

/// Returns the name of the first provider whose fingerprint occurs in `body`.
pub fn match_fingerprint(body: &[u8]) -> Option<&'static str> {
    KNOWN_PROVIDERS
        .iter()
        .find(|provider| provider.fingerprint.is_match(body))
        .map(|provider| provider.name)
}
