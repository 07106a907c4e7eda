use crate::{
    dto::functions::{ValidateOrderRequest, ValidateOrderResponse, ValidationFailure},
    middleware::auth::AuthUser,
    validation::OrderValidator,
};

/// Re-price an order against the ledger and compare with the caller's total.
pub fn validate_order(
    user: &AuthUser,
    request: &ValidateOrderRequest,
) -> Result<ValidateOrderResponse, ValidationFailure> {
    tracing::info!(
        user_id = %user.user_id,
        items = request.items.len(),
        total_amount = %request.total_amount,
        "validating order"
    );

    let report = OrderValidator::canonical()
        .validate(&request.items, request.total_amount)
        .map_err(|err| {
            tracing::warn!(user_id = %user.user_id, error = %err, "order rejected");
            ValidationFailure {
                error: err.to_string(),
                calculated_total: None,
                submitted_total: Some(request.total_amount),
            }
        })?;

    if !report.valid {
        tracing::error!(
            calculated_total = %report.calculated_total,
            total_amount = %request.total_amount,
            "price mismatch"
        );
        return Err(ValidationFailure {
            error: "Price validation failed".to_string(),
            calculated_total: Some(report.calculated_total),
            submitted_total: Some(request.total_amount),
        });
    }

    Ok(ValidateOrderResponse {
        valid: true,
        calculated_total: report.calculated_total,
    })
}
