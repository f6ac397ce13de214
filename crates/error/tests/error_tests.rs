//! # Error Crate Tests
//!
//! Tests for error types, responses, and conversions.

#[cfg(test)]
mod error_status_mapping_tests {
    use error::AppError;

    #[test]
    fn test_client_errors_map_to_4xx() {
        let errors = [
            (AppError::not_found("Team not found"), 404),
            (AppError::bad_request("Invalid rule number"), 400),
            (AppError::unauthorized("Missing identity"), 401),
            (AppError::forbidden("Admins only"), 403),
            (AppError::conflict("Already applied"), 409),
            (AppError::validation("Weights must sum to 100"), 422),
        ];

        for (err, status) in errors {
            assert_eq!(err.status().as_u16(), status, "{}", err);
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_server_errors_map_to_500() {
        let errors = [
            AppError::internal("panic"),
            AppError::database("rpc failed"),
            AppError::config("missing host"),
            AppError::migration("bad migration"),
        ];

        for err in errors {
            assert_eq!(err.status().as_u16(), 500);
            assert!(!err.is_client_error());
        }
    }

    #[test]
    fn test_display_prefix() {
        let err = AppError::conflict("Session is not in preparation");
        assert_eq!(err.to_string(), "Conflict: Session is not in preparation");
    }
}

#[cfg(test)]
mod validation_conversion_tests {
    use error::AppError;
    use validator::{Validate, ValidationError};

    fn weights_sum(form: &WeightsForm) -> Result<(), ValidationError> {
        if form.a + form.b == 100 {
            Ok(())
        }
        else {
            let mut err = ValidationError::new("weights_sum");
            err.message = Some("Weights must sum to 100".into());
            Err(err)
        }
    }

    #[derive(Validate)]
    #[validate(schema(function = "weights_sum"))]
    struct WeightsForm {
        #[validate(range(max = 100, message = "Weight must not exceed 100"))]
        a: i32,
        b: i32,
    }

    #[test]
    fn test_field_message_is_kept() {
        let form = WeightsForm {
            a: 150, b: -50
        };
        let err: AppError = form.validate().unwrap_err().into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.message().contains("Weight must not exceed 100"));
    }

    #[test]
    fn test_schema_message_is_kept() {
        let form = WeightsForm {
            a: 30, b: 30
        };
        let err: AppError = form.validate().unwrap_err().into();
        assert_eq!(err.message(), "Weights must sum to 100");
    }
}

#[cfg(test)]
mod api_response_tests {
    use error::{ApiResponse, PaginatedResponse};
    use serde_json::json;

    #[test]
    fn test_api_response_ok_with_data() {
        let response = ApiResponse::ok(json!({"id": "123", "name": "Q1 review"}));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["name"], "Q1 review");
    }

    #[test]
    fn test_paginated_response_serialization() {
        let page = PaginatedResponse::new(vec!["a", "b"], 1, 2, 3);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
        assert_eq!(json["pagination"]["total_pages"], 2);
        assert_eq!(json["pagination"]["has_next"], true);
    }
}
