// Status Code Annotator
// Pure lookup from an HTTP status code to its reason phrase

/// Canonical reason phrase for `code`
///
/// Known codes get their IANA phrase (plus 418). Other codes fall back to
/// their class name; every three-digit code from 500 up counts as a server
/// error. Anything outside 100..=999 is `"Unknown Status Code"`.
pub fn reason_phrase(code: i64) -> &'static str {
    match code {
        // 1xx Informational
        100 => "Continue",
        101 => "Switching Protocols",
        102 => "Processing",
        103 => "Early Hints",

        // 2xx Success
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        203 => "Non-Authoritative Information",
        204 => "No Content",
        205 => "Reset Content",
        206 => "Partial Content",
        207 => "Multi-Status",
        208 => "Already Reported",
        226 => "IM Used",

        // 3xx Redirection
        300 => "Multiple Choices",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        305 => "Use Proxy",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",

        // 4xx Client Errors
        400 => "Bad Request",
        401 => "Unauthorized",
        402 => "Payment Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        406 => "Not Acceptable",
        407 => "Proxy Authentication Required",
        408 => "Request Timeout",
        409 => "Conflict",
        410 => "Gone",
        411 => "Length Required",
        412 => "Precondition Failed",
        413 => "Payload Too Large",
        414 => "URI Too Long",
        415 => "Unsupported Media Type",
        416 => "Range Not Satisfiable",
        417 => "Expectation Failed",
        418 => "I'm a teapot",
        421 => "Misdirected Request",
        422 => "Unprocessable Entity",
        423 => "Locked",
        424 => "Failed Dependency",
        425 => "Too Early",
        426 => "Upgrade Required",
        428 => "Precondition Required",
        429 => "Too Many Requests",
        431 => "Request Header Fields Too Large",
        451 => "Unavailable For Legal Reasons",

        // 5xx Server Errors
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        505 => "HTTP Version Not Supported",
        506 => "Variant Also Negotiates",
        507 => "Insufficient Storage",
        508 => "Loop Detected",
        510 => "Not Extended",
        511 => "Network Authentication Required",

        100..=199 => "Informational",
        200..=299 => "Success",
        300..=399 => "Redirection",
        400..=499 => "Client Error",
        500..=999 => "Server Error",
        _ => "Unknown Status Code",
    }
}

/// Same as [`reason_phrase`] for a code still in text form
///
/// Text that is not an integer yields `"Invalid Status Code"`.
pub fn reason_phrase_str(code: &str) -> &'static str {
    match code.trim().parse::<i64>() {
        Ok(n) => reason_phrase(n),
        Err(_) => "Invalid Status Code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(reason_phrase(200), "OK");
        assert_eq!(reason_phrase(201), "Created");
        assert_eq!(reason_phrase(404), "Not Found");
        assert_eq!(reason_phrase(418), "I'm a teapot");
        assert_eq!(reason_phrase(511), "Network Authentication Required");
    }

    #[test]
    fn test_bucket_fallbacks() {
        assert_eq!(reason_phrase(199), "Informational");
        assert_eq!(reason_phrase(299), "Success");
        assert_eq!(reason_phrase(306), "Redirection");
        assert_eq!(reason_phrase(499), "Client Error");
        assert_eq!(reason_phrase(599), "Server Error");
        assert_eq!(reason_phrase(799), "Server Error");
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(reason_phrase(42), "Unknown Status Code");
        assert_ne!(reason_phrase(42), "Client Error");
        assert_eq!(reason_phrase(0), "Unknown Status Code");
        assert_eq!(reason_phrase(-200), "Unknown Status Code");
        assert_eq!(reason_phrase(1000), "Unknown Status Code");
    }

    #[test]
    fn test_text_codes() {
        assert_eq!(reason_phrase_str("201"), "Created");
        assert_eq!(reason_phrase_str(" 503\n"), "Service Unavailable");
        assert_eq!(reason_phrase_str("000"), "Unknown Status Code");
        assert_eq!(reason_phrase_str("abc"), "Invalid Status Code");
        assert_eq!(reason_phrase_str(""), "Invalid Status Code");
    }
}
