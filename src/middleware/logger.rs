use hyper::{Method, StatusCode, Uri};
use tracing::{info, warn};

pub fn log_request(method: &Method, uri: &Uri) {
    info!("{} {}", method, uri);
}

pub fn log_response(method: &Method, uri: &Uri, status: StatusCode) {
    if status.is_success() {
        info!("{} {} -> {}", method, uri, status);
    } else {
        warn!("{} {} -> {}", method, uri, status);
    }
}
