use std::collections::BTreeMap;

use climasync_api::models::DeviceKind;

use crate::errors::EnergyError;

#[derive(Debug, Clone, PartialEq)]
pub struct TariffConfig {
    price_per_kwh: f64,
    power_watts: BTreeMap<DeviceKind, f64>,
}

impl TariffConfig {
    pub fn new(
        price_per_kwh: f64,
        power_watts: BTreeMap<DeviceKind, f64>,
    ) -> Result<Self, EnergyError> {
        let mut tariff = Self {
            price_per_kwh: 0.0,
            power_watts: BTreeMap::new(),
        };

        tariff.set_price(price_per_kwh)?;
        for kind in DeviceKind::ALL {
            let watts = power_watts.get(&kind).copied().unwrap_or(0.0);
            tariff.set_power(kind, watts)?;
        }

        Ok(tariff)
    }

    pub fn price_per_kwh(&self) -> f64 {
        self.price_per_kwh
    }

    pub fn power(&self, kind: DeviceKind) -> f64 {
        self.power_watts.get(&kind).copied().unwrap_or_default()
    }

    pub fn power_map(&self) -> &BTreeMap<DeviceKind, f64> {
        &self.power_watts
    }

    pub fn set_price(&mut self, price_per_kwh: f64) -> Result<(), EnergyError> {
        if !is_positive(price_per_kwh) {
            return Err(EnergyError::InvalidPrice(price_per_kwh));
        }

        self.price_per_kwh = price_per_kwh;
        Ok(())
    }

    pub fn set_power(&mut self, kind: DeviceKind, watts: f64) -> Result<(), EnergyError> {
        if !is_positive(watts) {
            return Err(EnergyError::InvalidPower(watts));
        }

        self.power_watts.insert(kind, watts);
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> BTreeMap<DeviceKind, f64> {
        BTreeMap::from([
            (DeviceKind::Lighting, 20.0),
            (DeviceKind::Ventilation, 50.0),
            (DeviceKind::Fogger, 100.0),
            (DeviceKind::Heater, 150.0),
        ])
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let mut tariff = TariffConfig::new(2500.0, defaults()).unwrap();

        assert_eq!(tariff.set_price(0.0), Err(EnergyError::InvalidPrice(0.0)));
        assert_eq!(tariff.set_price(-3.0), Err(EnergyError::InvalidPrice(-3.0)));
        assert!(tariff.set_price(f64::NAN).is_err());
        assert_eq!(
            tariff.set_power(DeviceKind::Heater, -1.0),
            Err(EnergyError::InvalidPower(-1.0))
        );

        assert_eq!(tariff.price_per_kwh(), 2500.0);
        assert_eq!(tariff.power(DeviceKind::Heater), 150.0);
    }

    #[test]
    fn test_missing_device_power_is_rejected() {
        let mut powers = defaults();
        powers.remove(&DeviceKind::Fogger);

        assert_eq!(
            TariffConfig::new(2500.0, powers),
            Err(EnergyError::InvalidPower(0.0))
        );
    }

    #[test]
    fn test_updates_apply() {
        let mut tariff = TariffConfig::new(2500.0, defaults()).unwrap();

        tariff.set_price(3100.5).unwrap();
        tariff.set_power(DeviceKind::Lighting, 36.0).unwrap();

        assert_eq!(tariff.price_per_kwh(), 3100.5);
        assert_eq!(tariff.power_map()[&DeviceKind::Lighting], 36.0);
    }
}
