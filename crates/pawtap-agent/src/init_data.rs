// SPDX-FileCopyrightText: 2026 Pawtap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of the signed init-data payload from a web-app launch URL.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use pawtap_core::{InitData, TapperError};

const DATA_MARKER: &str = "tgWebAppData=";
const VERSION_MARKER: &str = "&tgWebAppVersion";
const FIELD_COUNT: usize = 6;

/// Characters left literal when re-encoding the user field.
const USER_KEEP: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Parses the init-data carried in a launch URL.
///
/// The payload sits between `tgWebAppData=` and `&tgWebAppVersion` and is
/// percent-decoded twice. Its first six `key=value` parts are taken by
/// position; only the user value is encoded again.
pub fn parse_launch_url(url: &str) -> Result<InitData, TapperError> {
    let (_, after) = url
        .split_once(DATA_MARKER)
        .ok_or_else(|| TapperError::InitData("launch URL has no tgWebAppData".into()))?;
    let raw = after.split(VERSION_MARKER).next().unwrap_or(after);

    let once = percent_decode_str(raw).decode_utf8_lossy();
    let decoded = percent_decode_str(&once).decode_utf8_lossy();

    let values = decoded
        .split('&')
        .take(FIELD_COUNT)
        .map(|part| {
            part.split_once('=')
                .map(|(_, value)| value.to_string())
                .ok_or_else(|| TapperError::InitData(format!("malformed init-data part `{part}`")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [user, chat_instance, chat_type, start_param, auth_date, hash]: [String; FIELD_COUNT] =
        values.try_into().map_err(|v: Vec<String>| {
            TapperError::InitData(format!(
                "init-data has {} fields, expected {FIELD_COUNT}",
                v.len()
            ))
        })?;

    Ok(InitData {
        user: utf8_percent_encode(&user, USER_KEEP).to_string(),
        chat_instance,
        chat_type,
        start_param,
        auth_date,
        hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn double_encoded_payload_is_rebuilt_in_order() {
        let url = "https://app.paws.community/?tgWebAppData=a%3D1%26b%3D2%26c%3D3%26d%3D4%26e%3D5%26f%3Dh&tgWebAppVersion=1";
        let init = parse_launch_url(url).unwrap();
        assert_eq!(
            init.to_string(),
            "user=1&chat_instance=2&chat_type=3&start_param=4&auth_date=5&hash=h"
        );
    }

    #[test]
    fn user_json_is_reencoded_once() {
        let url = "https://x/#tgWebAppData=user%3D%257B%2522id%2522%253A7%252C%2522first_name%2522%253A%2522A%2520b%2522%257D%26chat_instance%3D-55%26chat_type%3Dsender%26start_param%3Dref%26auth_date%3D1700000000%26hash%3Dabc&tgWebAppVersion=7.10";
        let init = parse_launch_url(url).unwrap();
        assert_eq!(
            init.user,
            "%7B%22id%22%3A7%2C%22first_name%22%3A%22A%20b%22%7D"
        );
        assert_eq!(init.chat_instance, "-55");
        assert_eq!(init.chat_type, "sender");
        assert_eq!(init.start_param, "ref");
        assert_eq!(init.auth_date, "1700000000");
        assert_eq!(init.hash, "abc");
    }

    #[test]
    fn extra_fields_are_ignored() {
        let url = "x?tgWebAppData=a%3D1%26b%3D2%26c%3D3%26d%3D4%26e%3D5%26f%3D6%26g%3D7";
        let init = parse_launch_url(url).unwrap();
        assert_eq!(init.hash, "6");
    }

    #[test]
    fn missing_marker_is_an_error() {
        assert!(matches!(
            parse_launch_url("https://example.com/?foo=bar"),
            Err(TapperError::InitData(_))
        ));
    }

    #[test]
    fn too_few_fields_is_an_error() {
        let url = "x?tgWebAppData=a%3D1%26b%3D2&tgWebAppVersion=1";
        let err = parse_launch_url(url).unwrap_err();
        assert!(err.to_string().contains("2 fields"), "{err}");
    }

    proptest! {
        #[test]
        fn parsing_never_panics(input in ".*") {
            let _ = parse_launch_url(&format!("https://x/?tgWebAppData={input}"));
        }

        #[test]
        fn plain_values_survive(values in proptest::collection::vec("[A-Za-z0-9_.~-]{1,12}", 6)) {
            let payload = ["user", "chat_instance", "chat_type", "start_param", "auth_date", "hash"]
                .iter()
                .zip(&values)
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            let url = format!("x?tgWebAppData={}&tgWebAppVersion=8", utf8_percent_encode(&payload, NON_ALPHANUMERIC));
            let init = parse_launch_url(&url).unwrap();
            prop_assert_eq!(init.to_string(), payload);
        }
    }
}
