use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::PINCODE_RE;
use crate::models::Area;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateAreaRequest {
    #[validate(length(min = 1, max = 100))]
    pub area_name: String,
    #[validate(length(min = 1, max = 50))]
    pub city: String,
    #[validate(length(min = 1, max = 50))]
    pub state: String,
    #[validate(regex(path = *PINCODE_RE, message = "Pincode must be 6 digits"))]
    pub pincode: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AreaList {
    #[schema(value_type = Vec<Area>)]
    pub items: Vec<Area>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pincode_must_be_six_digits() {
        let mut req = CreateAreaRequest {
            area_name: "Baner".into(),
            city: "Pune".into(),
            state: "Maharashtra".into(),
            pincode: "411045".into(),
        };
        assert!(req.validate().is_ok());

        req.pincode = "41104".into();
        assert!(req.validate().is_err());
        req.pincode = "41104A".into();
        assert!(req.validate().is_err());
    }
}
