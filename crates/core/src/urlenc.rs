use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// Same escape set as the web platform's encodeURIComponent: everything but
// alphanumerics and -_.!~*'() is percent-encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}
