use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use super::geo::Coordinates;
use super::origin::ZipDirectory;

pub(crate) const ZIP_CSV: &str = "zip,city,state,latitude,longitude\n\
78701,Austin,TX,30.2672,-97.7431\n\
78664,Round Rock,TX,30.5083,-97.6789\n\
78626,Georgetown,TX,30.6280,-97.6780\n\
78205,San Antonio,TX,29.4241,-98.4936\n\
75201,Dallas,TX,32.7767,-96.7970\n";

pub(crate) const AUSTIN: Coordinates = Coordinates::new(30.2672, -97.7431);

pub(crate) fn zip_directory() -> Arc<ZipDirectory> {
    Arc::new(ZipDirectory::from_reader(ZIP_CSV.as_bytes()).expect("zip fixture parses"))
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
