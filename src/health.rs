use log::{info, warn};

use crate::transport::{HttpRequest, Transport};

pub fn status_url(base: &str) -> String {
    format!("{}/status", base)
}

/// Pings `{base}/status`; any 2xx answer means reachable.
pub async fn check<T: Transport + ?Sized>(transport: &T, base: &str) -> bool {
    match transport.send(HttpRequest::get(status_url(base))).await {
        Ok(response) if response.is_success() => {
            info!("backend reachable at {}", base);
            true
        }
        Ok(response) => {
            warn!("backend at {} answered {}", base, response.status);
            false
        }
        Err(err) => {
            warn!("backend at {} unreachable: {}", base, err);
            false
        }
    }
}
