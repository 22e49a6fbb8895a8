// Application state for HTTP handlers
use crate::application::catalog_service::CatalogService;
use crate::application::delivery_service::DeliveryService;
use crate::application::immunization_service::ImmunizationService;
use crate::application::mortality_profile_service::MortalityProfileService;
use crate::application::prenatal_service::PrenatalService;
use crate::application::water_service::WaterService;

pub struct AppState {
    pub catalog_service: CatalogService,
    pub prenatal_service: PrenatalService,
    pub immunization_service: ImmunizationService,
    pub mortality_profile_service: MortalityProfileService,
    pub delivery_service: DeliveryService,
    pub water_service: WaterService,
}
