//! The session stored in the auth cookie: the API access token plus the signed-in user's profile.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::api::UserProfile;

mod datetime_format {
    //! Serializes a [time::OffsetDateTime] with a fixed-width hour.
    //!
    //! The default serializer writes "00:00:00.000000" as "0:00:00.0", which
    //! the matching parser rejects because it expects two hour digits.
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
    };

    /// Date time format for the session expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
    const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
             sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = dt
            .format(DATE_TIME_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&s, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// A signed-in user's session.
///
/// Route handlers behind the auth guard receive it with `Extension(session): Extension<Session>`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    /// The bearer token sent with every API request.
    pub access_token: String,

    /// The profile returned by the API when the user signed in, refreshed when settings change.
    pub user: UserProfile,

    #[serde(
        serialize_with = "datetime_format::serialize",
        deserialize_with = "datetime_format::deserialize"
    )]
    pub expires_at: OffsetDateTime,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= OffsetDateTime::now_utc()
    }
}

#[cfg(test)]
mod session_tests {
    use time::{Duration, OffsetDateTime, UtcOffset, macros::datetime};

    use crate::api::UserProfile;

    use super::Session;

    fn user() -> UserProfile {
        UserProfile {
            id: 1,
            email: "ana@example.com".to_owned(),
            full_name: "Ana".to_owned(),
            preferred_currency: "COP".to_owned(),
            preferred_locale: "es".to_owned(),
        }
    }

    #[test]
    fn serialise_session() {
        let session = Session {
            access_token: "abc".to_owned(),
            user: user(),
            expires_at: datetime!(2025-12-21 03:54:00).assume_offset(UtcOffset::UTC),
        };
        let expected = r#"{"access_token":"abc","user":{"id":1,"email":"ana@example.com","fullName":"Ana","preferredCurrency":"COP","preferredLocale":"es"},"expires_at":"2025-12-21 03:54:00.0 +00:00:00"}"#;

        let actual = serde_json::to_string(&session).unwrap();

        assert_eq!(expected, actual);
    }

    #[test]
    fn deserialise_session_with_midnight_expiry() {
        let session_string = r#"{"access_token":"abc","user":{"id":1,"email":"ana@example.com","fullName":"Ana","preferredCurrency":"COP","preferredLocale":"es"},"expires_at":"2025-12-21 00:00:00.0 +00:00:00"}"#;

        let actual: Session = serde_json::from_str(session_string).unwrap();

        assert_eq!(
            actual.expires_at,
            datetime!(2025-12-21 00:00:00).assume_offset(UtcOffset::UTC)
        );
        assert_eq!(actual.user, user());
    }

    #[test]
    fn expiry_check() {
        let mut session = Session {
            access_token: "abc".to_owned(),
            user: user(),
            expires_at: OffsetDateTime::now_utc() + Duration::minutes(1),
        };
        assert!(!session.is_expired());

        session.expires_at = OffsetDateTime::now_utc() - Duration::seconds(1);
        assert!(session.is_expired());
    }
}
