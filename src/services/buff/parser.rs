use super::error::{ MarketError, MarketResult };
use super::models::{ MarketItem, MarketResponse };

/// Decode a goods listing body into item records, in source order
pub fn parse_listings(body: &str) -> MarketResult<Vec<MarketItem>> {
    let response: MarketResponse = serde_json::from_str(body)?;

    if !response.is_ok() {
        return Err(MarketError::api_error(response.code.clone(), response.error_message()));
    }

    let page = response.data.ok_or(MarketError::MissingData)?;
    Ok(page.items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ok_envelope() {
        let items = parse_listings(
            r#"{
                "code": "OK",
                "data": {
                    "items": [
                        {"id": 1, "name": "AK-47 | 红线 (久经沙场)", "sell_min_price": "85.5"},
                        {"id": 2, "name": "AK-47 | 红线 (略有磨损)", "sell_min_price": "120"}
                    ],
                    "page_num": 1,
                    "total_page": 1,
                    "total_count": 2
                },
                "msg": null
            }"#
        ).unwrap();

        let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, vec!["AK-47 | 红线 (久经沙场)", "AK-47 | 红线 (略有磨损)"]);
    }

    #[test]
    fn test_parse_empty_page() {
        let items = parse_listings(r#"{"code": "OK", "data": {"items": []}}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_parse_api_error() {
        let err = parse_listings(r#"{"code": "Login Required", "error": "请先登录"}"#).unwrap_err();
        assert!(err.is_login_required());
        assert!(!err.is_processing_error());
    }

    #[test]
    fn test_parse_missing_data() {
        let err = parse_listings(r#"{"code": "OK"}"#).unwrap_err();
        assert!(matches!(err, MarketError::MissingData));
    }

    #[test]
    fn test_parse_malformed_body() {
        assert!(parse_listings("<html>登录</html>").unwrap_err().is_processing_error());
        assert!(
            parse_listings(r#"{"code": "OK", "data": {"items": [{"id": 1}]}}"#)
                .unwrap_err()
                .is_processing_error()
        );
    }
}
