use crate::transform::transform_service::TransformService;

#[derive(Clone)]
pub struct AppService {
    pub transform_service: TransformService,
}

impl AppService {
    pub fn new(transform_service: TransformService) -> Self {
        Self { transform_service }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: AppService,
}

impl AppState {
    pub fn new(transform_service: TransformService) -> Self {
        Self {
            service: AppService::new(transform_service),
        }
    }
}
