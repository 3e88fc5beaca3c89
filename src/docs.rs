use utoipa::OpenApi;

use crate::modules::results::model::{DeliveryOutcome, DeliveryRequest, MarksRecord, StudentRecord};

#[derive(OpenApi)]
#[openapi(
    paths(crate::modules::results::controller::send_result),
    components(schemas(DeliveryRequest, DeliveryOutcome, StudentRecord, MarksRecord)),
    tags(
        (name = "Results", description = "Render a student's result and email it as a PDF")
    ),
    info(
        title = "Result Mailer API",
        description = "Generates student result documents and delivers them by email"
    )
)]
pub struct ApiDoc;
