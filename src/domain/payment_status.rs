// Collapses the gateway's intent lifecycle into the four states we persist
pub fn map_gateway_status(status: &str) -> &'static str {
    match status {
        "requires_payment_method"
        | "requires_confirmation"
        | "requires_action"
        | "requires_capture"
        | "processing" => "pending",
        "succeeded" => "succeeded",
        "canceled" => "canceled",
        _ => "failed"
    }
}
