pub mod transform_controller;
pub mod transform_service;
