//! Field-by-field draft validation.
//!
//! Validators are pure: they read a snapshot and return a fresh
//! `Validation`, so running them on every keystroke and once more before
//! submit always agrees for the same draft.

use std::collections::BTreeMap;

use crate::mask::Mask;
use crate::types::{Client, ClientField, Color, Field, Vehicle, VehicleField};

pub const MIN_MANUFACTURE_YEAR: i32 = 1900;

/// Error message per field; an empty message means the field is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation<F: Field> {
    messages: BTreeMap<F, String>,
}

impl<F: Field> Default for Validation<F> {
    fn default() -> Self {
        Self {
            messages: F::ALL.iter().map(|f| (*f, String::new())).collect(),
        }
    }
}

impl<F: Field> Validation<F> {
    fn reject(&mut self, field: F, message: &str) {
        self.messages.insert(field, message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.messages.values().all(String::is_empty)
    }

    pub fn message(&self, field: F) -> &str {
        self.messages.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn invalid_fields(&self) -> Vec<F> {
        self.messages
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(f, _)| *f)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.messages.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn numeric(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn vehicle(v: &Vehicle, current_year: i32) -> Validation<VehicleField> {
    let mut result = Validation::default();

    if blank(&v.brand) {
        result.reject(VehicleField::Brand, "A marca deve ser preenchida");
    }
    if blank(&v.model) {
        result.reject(VehicleField::Model, "O modelo deve ser preenchido");
    }
    if blank(&v.color) {
        result.reject(VehicleField::Color, "Escolha uma cor");
    } else if Color::from_label(v.color.trim()).is_none() {
        result.reject(VehicleField::Color, "Cor inválida");
    }
    if !(MIN_MANUFACTURE_YEAR..=current_year).contains(&v.manufacture_year) {
        result.reject(VehicleField::ManufactureYear, "Ano de fabricação inválido");
    }
    if blank(&v.plate) {
        result.reject(VehicleField::Plate, "A placa deve ser preenchida");
    } else if !Mask::plate().is_complete(&v.plate) {
        result.reject(VehicleField::Plate, "A placa deve ser preenchida completamente");
    }
    match numeric(&v.price) {
        Some(price) if price >= 0.0 => {}
        _ => result.reject(VehicleField::Price, "O preço deve ser um número não negativo"),
    }

    result
}

pub fn client(c: &Client) -> Validation<ClientField> {
    let mut result = Validation::default();

    let required = [
        (ClientField::Name, &c.name, "O nome deve ser preenchido"),
        (ClientField::Cpf, &c.cpf, "O CPF deve ser preenchido"),
        (ClientField::Rg, &c.rg, "O RG deve ser preenchido"),
        (ClientField::Street, &c.street, "O endereço deve ser preenchido"),
        (ClientField::HouseNumber, &c.house_number, "O número do imóvel deve ser preenchido"),
        (ClientField::Neighborhood, &c.neighborhood, "O bairro deve ser preenchido"),
        (ClientField::Municipality, &c.municipality, "O município deve ser preenchido"),
        (ClientField::State, &c.state, "O estado deve ser preenchido"),
        (ClientField::Phone, &c.phone, "O telefone deve ser preenchido"),
        (ClientField::Email, &c.email, "O e-mail deve ser preenchido"),
    ];
    for (field, value, message) in required {
        if blank(value) {
            result.reject(field, message);
        }
    }

    if !blank(&c.house_number) && numeric(&c.house_number).is_none() {
        result.reject(ClientField::HouseNumber, "O número do imóvel deve ser numérico");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Flag, Record};

    const YEAR: i32 = 2024;

    fn valid_vehicle() -> Vehicle {
        Vehicle {
            id: None,
            brand: "Volkswagen".to_string(),
            model: "Fusca".to_string(),
            color: "Azul".to_string(),
            manufacture_year: 1978,
            imported: Flag(false),
            plate: "ABC-1D23".to_string(),
            price: "15000".to_string(),
        }
    }

    fn valid_client() -> Client {
        Client {
            id: None,
            name: "Maria da Silva".to_string(),
            cpf: "123.456.789-00".to_string(),
            rg: "12.345.678-9".to_string(),
            street: "Rua das Flores".to_string(),
            house_number: "120".to_string(),
            complement: String::new(),
            neighborhood: "Centro".to_string(),
            municipality: "Franca".to_string(),
            state: "SP".to_string(),
            phone: "(16) 99999-0000".to_string(),
            email: "maria@example.com".to_string(),
        }
    }

    fn set_text(c: &mut Client, field: ClientField, value: &str) {
        c.set_field(field, value.into()).unwrap();
    }

    #[test]
    fn filled_records_are_valid() {
        assert!(vehicle(&valid_vehicle(), YEAR).is_valid());
        assert!(client(&valid_client()).is_valid());
    }

    #[test]
    fn every_field_has_an_entry() {
        let v = vehicle(&valid_vehicle(), YEAR);
        assert_eq!(v.iter().count(), VehicleField::ALL.len());
        let c = client(&valid_client());
        assert_eq!(c.iter().count(), ClientField::ALL.len());
    }

    #[test]
    fn blank_required_client_field_flags_exactly_that_field() {
        let required = ClientField::ALL
            .iter()
            .copied()
            .filter(|f| *f != ClientField::Complement);
        for field in required {
            for blank in ["", "   ", "\t"] {
                let mut c = valid_client();
                set_text(&mut c, field, blank);
                let result = client(&c);
                assert!(!result.is_valid(), "{field:?} = {blank:?}");
                assert_eq!(result.invalid_fields(), vec![field]);
                assert!(!result.message(field).is_empty());
            }
        }
    }

    #[test]
    fn complement_is_optional() {
        let mut c = valid_client();
        c.complement = "  ".to_string();
        assert!(client(&c).is_valid());
    }

    #[test]
    fn house_number_must_be_numeric() {
        let mut c = valid_client();
        c.house_number = "12A".to_string();
        let result = client(&c);
        assert_eq!(result.invalid_fields(), vec![ClientField::HouseNumber]);
        assert_eq!(result.message(ClientField::HouseNumber), "O número do imóvel deve ser numérico");
    }

    #[test]
    fn blank_required_vehicle_fields() {
        let cases = [
            (VehicleField::Brand, "A marca deve ser preenchida"),
            (VehicleField::Model, "O modelo deve ser preenchido"),
            (VehicleField::Color, "Escolha uma cor"),
            (VehicleField::Plate, "A placa deve ser preenchida"),
        ];
        for (field, message) in cases {
            let mut v = valid_vehicle();
            v.set_field(field, " ".into()).unwrap();
            let result = vehicle(&v, YEAR);
            assert_eq!(result.invalid_fields(), vec![field]);
            assert_eq!(result.message(field), message);
        }
    }

    #[test]
    fn color_outside_palette_is_invalid() {
        let mut v = valid_vehicle();
        v.color = "Magenta".to_string();
        assert_eq!(vehicle(&v, YEAR).invalid_fields(), vec![VehicleField::Color]);
    }

    #[test]
    fn year_bounds() {
        let mut v = valid_vehicle();
        v.manufacture_year = 1899;
        assert!(!vehicle(&v, YEAR).is_valid());
        v.manufacture_year = 1900;
        assert!(vehicle(&v, YEAR).is_valid());
        v.manufacture_year = YEAR;
        assert!(vehicle(&v, YEAR).is_valid());
        v.manufacture_year = YEAR + 1;
        assert_eq!(vehicle(&v, YEAR).invalid_fields(), vec![VehicleField::ManufactureYear]);
    }

    #[test]
    fn partial_plate_is_invalid() {
        let mut v = valid_vehicle();
        v.plate = "ABC-1".to_string();
        assert_eq!(
            vehicle(&v, YEAR).message(VehicleField::Plate),
            "A placa deve ser preenchida completamente"
        );
    }

    #[test]
    fn price_must_be_non_negative_number() {
        let mut v = valid_vehicle();
        for bad in ["", "abc", "-1", "NaN", "inf"] {
            v.price = bad.to_string();
            assert_eq!(vehicle(&v, YEAR).invalid_fields(), vec![VehicleField::Price], "{bad:?}");
        }
        for good in ["0", "0.0", "1999.90"] {
            v.price = good.to_string();
            assert!(vehicle(&v, YEAR).is_valid(), "{good:?}");
        }
    }

    #[test]
    fn validation_is_idempotent() {
        let mut c = valid_client();
        c.email = String::new();
        assert_eq!(client(&c), client(&c));

        let mut v = valid_vehicle();
        v.price = "x".to_string();
        assert_eq!(vehicle(&v, YEAR), vehicle(&v, YEAR));
    }
}
