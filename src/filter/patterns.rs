//! Compiled pattern catalogue shared by the filtering stages.
//!
//! Patterns compile lazily on first use. A pattern that fails to compile
//! becomes `None` and simply never matches, so no stage can panic on it.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// A lazily compiled regular expression.
pub(crate) type Pattern = LazyLock<Option<Regex>>;

macro_rules! patterns {
    ($($(#[$meta:meta])* $name:ident = $re:expr;)+) => {
        $(
            $(#[$meta])*
            pub(crate) static $name: Pattern = LazyLock::new(|| Regex::new($re).ok());
        )+
    };
}

/// True when `pattern` compiled and matches somewhere in `text`.
pub(crate) fn is_match(pattern: &Pattern, text: &str) -> bool {
    match &**pattern {
        Some(re) => re.is_match(text),
        None => false,
    }
}

/// True when any pattern in `set` matches `text`.
pub(crate) fn any_match(set: &[&Pattern], text: &str) -> bool {
    set.iter().any(|pattern| is_match(pattern, text))
}

/// Capture groups of the leftmost match, if any.
pub(crate) fn captures<'t>(pattern: &Pattern, text: &'t str) -> Option<Captures<'t>> {
    match &**pattern {
        Some(re) => re.captures(text),
        None => None,
    }
}

patterns! {
    // Line shape

    /// `YYYY-MM-DD HH:MM:SS:mmm - [` at the start of a line.
    STRUCTURED_PREFIX = r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}:\d{3} - \[";
    TIMESTAMP = r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}:\d{3}";
    LEVEL_TAG = r"^.*? - \[([^\]]+)\]";
    SOURCE_TAG = r"(?i)\[(?:debug|info|warn|error)\] \[([^\]]+)\]";
    FIRST_BRACKET = r"\[([^\]]+)\]";

    // Normalization

    HEX_ADDRESS = r"\b0x[0-9a-fA-F]{10,}";
    OBJECT_ID = r"(?i)@[a-f0-9]{4,}\b";
    OBJECT_QUALIFIER = r"^\s*\([^)]*\)";
    FRACTIONAL_MS = r"\b\d+\.\d+ms\b";
    INTEGER_MS = r"\b\d+ms\b";
    HTTP_URL = r"(?i)http://\S+";
    TRAILING_PORT = r":\d{4,5}(\s|$)";
    LONG_PATH = r#"(/[^\s'"/]+)/[^\s'"]+(/[^\s'"/]+)"#;
    WHITESPACE_RUN = r"\s+";

    // Error signal

    ERROR_SIGNAL = r"(?i)Error|Exception|Failed|Cannot|NoSuchElement|Timeout|InvalidArgument|StaleElement|status [4-5]\d{2}|exit.*code [1-9]\d*";
    /// An inbound HTTP response with a 4xx/5xx status.
    HTTP_FAILURE_RESPONSE = r"\[HTTP\] \[HTTP\] <--.*\s(4\d{2}|5\d{2})\s";

    // HTTP traffic

    HTTP_REQUEST = r"\[HTTP\] \[HTTP\] -->";
    HTTP_SESSION_RESPONSE = r"\[HTTP\] \[HTTP\] <--.*/session.*200";
    SESSION_VERB = r"POST.*/session|DELETE.*/session";
    SESSION_CHANGE = r"(?i)session.*created|session.*deleted";
    HTTP_LARGE_RESPONSE = r"\[HTTP\] \[HTTP\] <--.*200\s+\d{4,}";
    /// A JSON-ish body carrying an identifying key.
    REQUEST_BODY = r#"(?i)^[^{]*\{.*(value|id|using|text).*["']"#;

    // Classifier

    DEBUG_TAG = r"(?i)\[debug\]";
    WARNING = r"(?i)warn";
    NON_DEBUG_SESSION = r"(?i)Session created|Session deleted|New.*session";
    DRIVER_DISCOVERY = r"(?i)Appium.*creating|Driver.*installed|Attempting.*find.*driver";
    WDA_MENTION = r"(?i)WDA|WebDriverAgent";
    WDA_STATE = r"(?i)Error|Failed|Cannot|Ready";
    WDA_REUSE = r"(?i)reuse.*WDA|Using.*WDA";
    CAPABILITY_MENTION = r"(?i)capability";
    CAPABILITY_STATE = r"(?i)changed|not recognized|provided";
    INTERNAL_ERROR = r"(?i)Encountered.*internal.*error|Matched W3C error code";
    NATIVE_LOOKUP = r"(?i)doNativeFind|findNativeElement|NoSuchElement";
    STACK_FRAME = r"(?i)\bat\s+\w+\.|stack trace|traceback";

    // Session setup span

    SESSION_START = r"(?i)Session created with session id";
    SESSION_READY = r"(?i)session.*created successfully";
    CAPABILITY_NOTICE = r"(?i)capability.*changed|not recognized";
    /// Failures kept verbatim from the setup span.
    SPAN_ERROR = r"(?i)Error|Exception|Failed|Cannot|NoSuchElement";
    SETUP_WARNING = r"(?i)warning|deprecated|may cause.*behavior";
    SETUP_CRITICAL = r"(?i)Session.*created|Error|Exception|Failed|Cannot|NoSuchElement|WDA|WebDriverAgent";
    CAPABILITY_NAME = r#"(?i)capability.*?['"]([^'"]+)['"]|capability.*?([A-Za-z_][A-Za-z0-9_]*)"#;

    // Response truncation

    TRUNCATION_GUARD = r"(?i)error|fail|null|undefined|status [4-5]\d{2}";
    DEBUG_VALUE_RESPONSE = r"Got response with status 200.*value.*\{";
    VALUE_TAIL = r"value.*?(\{.+)";
    HTTP_OK_BODY = r"\[HTTP\] \[HTTP\] <--.*200.*\{";
    JSON_TAIL = r"(\{.+)";

    // Grouping

    BASIC_ERROR = r"(?i)Error|Exception|Failed|Cannot|NoSuchElement";
    ANY_HTTP_REQUEST = r"(?i)\[HTTP\].*-->";
    ANY_HTTP_FAILURE = r"(?i)\[HTTP\].*<--.*\s(4\d{2}|5\d{2})\s";
    IDENTIFYING_FIELD = r#"(?i)value.*["'][^"']{3,}["']|id.*["'][^"']{3,}["']|using.*["'][^"']{3,}["']|text.*["'][^"']{3,}["']"#;
    BODY_FIELD = r#"(?i)value.*["']|id.*["']|using.*["']"#;
    JSON_IDENTIFIER = r#"(?i)^[^{]*\{.*(value|id|using).*["']"#;
    W3C_SIGNATURE = r"(?i)Matched W3C error code|Encountered internal error running command|NoSuchElementError";
    ELEMENT_ID = r#"(?i)value\s+['"]([^"']+)['"]|unable to find.*value\s+['"]([^"']+)['"]"#;
    NOT_FOUND_BODY = r"(?i)status 404|\s404\s|unable to find";
}

/// Routine success chatter, suppressed away from errors.
pub(crate) static ROUTINE_SUCCESS: [&Pattern; 5] = [
    &FOUND_ELEMENT,
    &ELEMENT_VISIBLE,
    &COMMAND_SUCCEEDED,
    &WAIT_COMPLETED,
    &ELEMENT_LOOKUP_OK,
];

patterns! {
    FOUND_ELEMENT = r"(?i)Successfully.*found.*element";
    ELEMENT_VISIBLE = r"(?i)Element.*is.*visible";
    COMMAND_SUCCEEDED = r"(?i)Command.*succeeded";
    WAIT_COMPLETED = r"(?i)Waiting.*completed";
    ELEMENT_LOOKUP_OK = r"(?i)Got response with status 200.*element.*200";
}

/// Known noisy debug and HTTP bookkeeping lines.
pub(crate) static NOISE: [&Pattern; 19] = [
    &NOISE_PLUGIN_HANDLING,
    &NOISE_COMMAND_DISPATCH,
    &NOISE_PROXYING,
    &NOISE_ROUTINE_RESPONSE,
    &NOISE_CONDITION_POLLING,
    &NOISE_LOCATOR_STRATEGIES,
    &NOISE_SETTING_UNCHANGED,
    &NOISE_DIRECT_PROXY,
    &NOISE_W3C_ACTIONS,
    &NOISE_BODY_PROPERTY,
    &NOISE_PROTOCOL_CACHE,
    &NOISE_CRASH_REPORTS,
    &NOISE_DRIVER_VERSIONS,
    &NOISE_SCREENSHOT,
    &NOISE_DEVICE_OBJECT,
    &NOISE_HTTP_ACK,
    &NOISE_CONTEXT_REQUEST,
    &NOISE_CONTEXT_RESPONSE,
    &NOISE_HTTP_SEPARATOR,
];

patterns! {
    NOISE_PLUGIN_HANDLING = r"(?i)\[debug\].*?(?:Clearing new command timeout|Plugins which can handle|Plugin.*is now handling|Executing default handling)";
    NOISE_COMMAND_DISPATCH = r"(?i)\[debug\].*?(?:Executing command|Calling AppiumDriver|Matched.*to command name)";
    NOISE_PROXYING = r"(?i)\[debug\].*?Proxying \[.*\] to \[.*\] with (?:no )?body";
    NOISE_ROUTINE_RESPONSE = r"(?i)\[debug\].*?(?:Got response with status 200|Responding to client)";
    NOISE_CONDITION_POLLING = r"(?i)\[debug\].*?Waiting up to \d+ ms for condition";
    NOISE_LOCATOR_STRATEGIES = r"(?i)\[debug\].*?(?:Valid locator strategies|Event.*logged at)";
    NOISE_SETTING_UNCHANGED = r"(?i)\[debug\].*?The value of.*setting did not change";
    NOISE_DIRECT_PROXY = r"(?i)\[debug\].*?Would have proxied command directly";
    NOISE_W3C_ACTIONS = r"(?i)\[debug\].*?(?:Received the following W3C actions|Preprocessed actions)";
    NOISE_BODY_PROPERTY = r"(?i)\[debug\].*?Added.*property.*to.*request body";
    NOISE_PROTOCOL_CACHE = r"(?i)\[debug\].*?(?:Cached the protocol value|Available devices)";
    NOISE_CRASH_REPORTS = r"(?i)\[debug\].*?Crash reports root.*does not exist";
    NOISE_DRIVER_VERSIONS = r"(?i)\[debug\].*?Checking BaseDriver versions";
    NOISE_SCREENSHOT = r"(?i)\[debug\].*?Taking screenshot with WDA";
    NOISE_DEVICE_OBJECT = r"(?i)\[debug\].*?Creating iDevice object";
    NOISE_HTTP_ACK = r"\[HTTP\] \[HTTP\] <-- .* 200 .* -\d+$";
    NOISE_CONTEXT_REQUEST = r"\[HTTP\] \[HTTP\] --> GET.*/context.*\{\}$";
    NOISE_CONTEXT_RESPONSE = r"\[HTTP\] \[HTTP\] <-- GET.*/context 200\s+\d+\s+\d+$";
    NOISE_HTTP_SEPARATOR = r"^.*? - \[HTTP\] \[HTTP\]\s*$";
}

/// Critical lifecycle phrases that always survive classification.
pub(crate) static LIFECYCLE: [&Pattern; 13] = [
    &LIFECYCLE_SESSION_CHANGE,
    &LIFECYCLE_SESSION_VERB,
    &LIFECYCLE_NEW_SESSION,
    &LIFECYCLE_PROTOCOL,
    &LIFECYCLE_SESSION_ID,
    &LIFECYCLE_ORIGINAL_ERROR,
    &LIFECYCLE_CAPABILITY_BEHAVIOR,
    &LIFECYCLE_UNRECOGNIZED_CAPABILITIES,
    &LIFECYCLE_UNKNOWN_ROUTE,
    &LIFECYCLE_CAPABILITY_CHANGE,
    &LIFECYCLE_WDA_REUSE,
    &LIFECYCLE_WDA_AGENT,
    &LIFECYCLE_WDA_BUILD,
];

patterns! {
    LIFECYCLE_SESSION_CHANGE = r"(?i)Session.*created|Session.*deleted|Session.*destroyed";
    LIFECYCLE_SESSION_VERB = r"(?i)Creating.*session|Deleting.*session";
    LIFECYCLE_NEW_SESSION = r"(?i)New.*session.*created.*successfully";
    LIFECYCLE_PROTOCOL = r"(?i)Determined.*protocol";
    LIFECYCLE_SESSION_ID = r"(?i)Session.*created.*with.*session.*id";
    LIFECYCLE_ORIGINAL_ERROR = r"(?i)Cannot retrieve.*Original error";
    LIFECYCLE_CAPABILITY_BEHAVIOR = r"(?i)Capability.*changed.*may cause.*behavior";
    LIFECYCLE_UNRECOGNIZED_CAPABILITIES = r"(?i)The following capabilities.*provided.*not recognized";
    LIFECYCLE_UNKNOWN_ROUTE = r"(?i)Proxying to WDA with an unknown route";
    LIFECYCLE_CAPABILITY_CHANGE = r"(?i)Capability.*changed from.*to";
    LIFECYCLE_WDA_REUSE = r"(?i)Will reuse.*WDA instance";
    LIFECYCLE_WDA_AGENT = r"(?i)Using.*WDA.*agent|Using.*WDA.*path";
    LIFECYCLE_WDA_BUILD = r"(?i)WDA.*build.*settings";
}

/// Source tags of subsystems whose output is always kept.
pub(crate) const CRITICAL_SOURCES: [&str; 6] = [
    "idevice",
    "xcuitest",
    "wdproxy",
    "w3c",
    "webdriveragent",
    "wda",
];
