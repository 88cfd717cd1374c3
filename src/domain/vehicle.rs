#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleType{
    Bike,
    Motorcycle,
    Car
}

impl VehicleType {
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim() {
            "bike" => Ok(VehicleType::Bike),
            "motorcycle" => Ok(VehicleType::Motorcycle),
            "car" => Ok(VehicleType::Car),
            other => Err(format!("vehicleType must be one of bike, motorcycle, car (got '{}')", other))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Bike => "bike",
            VehicleType::Motorcycle => "motorcycle",
            VehicleType::Car => "car"
        }
    }
}
