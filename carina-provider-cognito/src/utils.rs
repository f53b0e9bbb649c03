//! Utility functions for value normalization and conversion

/// Normalize region value (e.g., "aws.Region.ap_northeast_1" -> "ap-northeast-1")
pub fn normalize_region(s: &str) -> String {
    let region_part = if s.contains('.') {
        s.split('.').next_back().unwrap_or(s)
    } else {
        s
    };
    region_part.replace('_', "-")
}

/// Strip the DSL namespace from an enum value
///
/// - "cognito.user_pool.MfaConfiguration.off" -> "off"
/// - "AliasAttribute.phone_number" -> "phone_number"
/// - "email" -> "email"
///
/// Underscores are kept: Cognito enum values such as `phone_number`
/// use them on the wire too.
pub fn enum_variant(value: &str) -> &str {
    value.rsplit('.').next().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_region() {
        assert_eq!(normalize_region("ap_northeast_1"), "ap-northeast-1");
        assert_eq!(normalize_region("aws.Region.us_east_1"), "us-east-1");
        assert_eq!(normalize_region("eu-west-1"), "eu-west-1");
    }

    #[test]
    fn test_enum_variant() {
        assert_eq!(enum_variant("cognito.user_pool.MfaConfiguration.off"), "off");
        assert_eq!(enum_variant("AliasAttribute.phone_number"), "phone_number");
        assert_eq!(enum_variant("preferred_username"), "preferred_username");
    }
}
