use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::{LoginRequest, ProductFields, ProductInput, RegisterRequest, UpdateProfileRequest};

/// Field name mapped to every message that failed for it. All rules for a
/// request are evaluated before reporting, not just the first.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_STRING_LENGTH: usize = 255;
pub const MAX_IMAGE_BYTES: usize = 2048 * 1024;

const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

pub fn add_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

fn require(errors: &mut FieldErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        add_error(errors, field, format!("The {} field is required.", field));
    }
}

pub fn validate_registration(req: &RegisterRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    require(&mut errors, "name", &req.name);
    require(&mut errors, "lastname", &req.lastname);
    require(&mut errors, "country", &req.country);
    require(&mut errors, "phone", &req.phone);
    require(&mut errors, "city", &req.city);
    require(&mut errors, "address", &req.address);
    require(&mut errors, "postalcode", &req.postalcode);

    if req.email.trim().is_empty() {
        add_error(&mut errors, "email", "The email field is required.");
    } else if !is_valid_email(&req.email) {
        add_error(&mut errors, "email", "The email must be a valid email address.");
    }

    if req.password.is_empty() {
        add_error(&mut errors, "password", "The password field is required.");
    } else if req.password.len() < MIN_PASSWORD_LENGTH {
        add_error(
            &mut errors,
            "password",
            format!("The password must be at least {} characters.", MIN_PASSWORD_LENGTH),
        );
    }

    if req.password != req.password_confirmation {
        add_error(&mut errors, "password", "The password confirmation does not match.");
    }

    errors
}

pub fn validate_login(req: &LoginRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if req.email.trim().is_empty() {
        add_error(&mut errors, "email", "The email field is required.");
    } else if !is_valid_email(&req.email) {
        add_error(&mut errors, "email", "The email must be a valid email address.");
    }

    if req.password.is_empty() {
        add_error(&mut errors, "password", "The password field is required.");
    }

    errors
}

pub fn validate_profile_update(req: &UpdateProfileRequest) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(ref name) = req.name {
        if name.len() > MAX_STRING_LENGTH {
            add_error(
                &mut errors,
                "name",
                format!("The name must not be greater than {} characters.", MAX_STRING_LENGTH),
            );
        }
    }

    if let Some(ref lastname) = req.lastname {
        if lastname.len() > MAX_STRING_LENGTH {
            add_error(
                &mut errors,
                "lastname",
                format!(
                    "The lastname must not be greater than {} characters.",
                    MAX_STRING_LENGTH
                ),
            );
        }
    }

    if let Some(ref email) = req.email {
        if !is_valid_email(email) {
            add_error(&mut errors, "email", "The email must be a valid email address.");
        }
    }

    errors
}

/// Validates a product create/update form. `is_create` makes name and price
/// mandatory; updates treat every field as optional.
pub fn validate_product(
    input: &ProductInput,
    is_create: bool,
) -> std::result::Result<ProductFields, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut price = None;

    match input.name {
        Some(ref name) => {
            if name.trim().is_empty() {
                add_error(&mut errors, "name", "The name field is required.");
            } else if name.len() > MAX_STRING_LENGTH {
                add_error(
                    &mut errors,
                    "name",
                    format!("The name must not be greater than {} characters.", MAX_STRING_LENGTH),
                );
            }
        }
        None if is_create => {
            add_error(&mut errors, "name", "The name field is required.");
        }
        None => {}
    }

    match input.price {
        Some(ref raw) => match Decimal::from_str(raw.trim()) {
            Ok(value) if value < Decimal::ZERO => {
                add_error(&mut errors, "price", "The price must be at least 0.");
            }
            Ok(value) => price = Some(value),
            Err(_) => {
                add_error(&mut errors, "price", "The price must be a number.");
            }
        },
        None if is_create => {
            add_error(&mut errors, "price", "The price field is required.");
        }
        None => {}
    }

    if let Some(ref image) = input.image {
        if !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
            add_error(
                &mut errors,
                "image",
                "The image must be a file of type: jpg, jpeg, png.",
            );
        }

        if image.data.len() > MAX_IMAGE_BYTES {
            add_error(
                &mut errors,
                "image",
                "The image must not be greater than 2048 kilobytes.",
            );
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProductFields {
        name: input.name.clone(),
        price,
        description: input.description.clone(),
        category: input.category.clone(),
    })
}

pub fn validate_quantity(quantity: i32) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if quantity < 1 {
        add_error(&mut errors, "quantity", "The quantity must be at least 1.");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageUpload;

    fn empty_registration() -> RegisterRequest {
        RegisterRequest {
            name: String::new(),
            lastname: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: String::new(),
            country: String::new(),
            phone: String::new(),
            city: String::new(),
            address: String::new(),
            postalcode: String::new(),
        }
    }

    fn valid_registration() -> RegisterRequest {
        RegisterRequest {
            name: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
            password: "hunter2hunter2".to_string(),
            password_confirmation: "hunter2hunter2".to_string(),
            country: "UK".to_string(),
            phone: "555-0100".to_string(),
            city: "London".to_string(),
            address: "12 Analytical St".to_string(),
            postalcode: "E1 6AN".to_string(),
        }
    }

    #[test]
    fn test_registration_reports_every_missing_field() {
        let errors = validate_registration(&empty_registration());

        for field in [
            "name",
            "lastname",
            "email",
            "password",
            "country",
            "phone",
            "city",
            "address",
            "postalcode",
        ] {
            assert!(errors.contains_key(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_registration_valid_request_passes() {
        assert!(validate_registration(&valid_registration()).is_empty());
    }

    #[test]
    fn test_registration_password_confirmation_mismatch() {
        let mut req = valid_registration();
        req.password_confirmation = "different-password".to_string();

        let errors = validate_registration(&req);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors["password"],
            vec!["The password confirmation does not match.".to_string()]
        );
    }

    #[test]
    fn test_registration_short_password() {
        let mut req = valid_registration();
        req.password = "short".to_string();
        req.password_confirmation = "short".to_string();

        let errors = validate_registration(&req);
        assert_eq!(
            errors["password"],
            vec!["The password must be at least 8 characters.".to_string()]
        );
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@nodot"));
        assert!(!is_valid_email("a@.com"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = validate_login(&LoginRequest {
            email: String::new(),
            password: String::new(),
        });

        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("password"));
    }

    #[test]
    fn test_profile_update_empty_request_is_valid() {
        let errors = validate_profile_update(&UpdateProfileRequest {
            name: None,
            lastname: None,
            email: None,
        });

        assert!(errors.is_empty());
    }

    #[test]
    fn test_profile_update_rejects_bad_email() {
        let errors = validate_profile_update(&UpdateProfileRequest {
            name: None,
            lastname: None,
            email: Some("not-an-email".to_string()),
        });

        assert!(errors.contains_key("email"));
    }

    #[test]
    fn test_product_create_requires_name_and_price() {
        let result = validate_product(&ProductInput::default(), true);

        let errors = result.unwrap_err();
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("price"));
    }

    #[test]
    fn test_product_update_all_fields_optional() {
        let fields = validate_product(&ProductInput::default(), false).unwrap();

        assert!(fields.name.is_none());
        assert!(fields.price.is_none());
    }

    #[test]
    fn test_product_price_must_be_numeric() {
        let input = ProductInput {
            name: Some("Chair".to_string()),
            price: Some("cheap".to_string()),
            ..ProductInput::default()
        };

        let errors = validate_product(&input, true).unwrap_err();
        assert_eq!(errors["price"], vec!["The price must be a number.".to_string()]);
    }

    #[test]
    fn test_product_price_must_be_non_negative() {
        let input = ProductInput {
            name: Some("Chair".to_string()),
            price: Some("-0.01".to_string()),
            ..ProductInput::default()
        };

        let errors = validate_product(&input, true).unwrap_err();
        assert_eq!(errors["price"], vec!["The price must be at least 0.".to_string()]);
    }

    #[test]
    fn test_product_price_parses_to_decimal() {
        let input = ProductInput {
            name: Some("Chair".to_string()),
            price: Some("19.99".to_string()),
            ..ProductInput::default()
        };

        let fields = validate_product(&input, true).unwrap();
        assert_eq!(fields.price, Some(Decimal::new(1999, 2)));
    }

    #[test]
    fn test_product_rejects_non_raster_image() {
        let input = ProductInput {
            name: Some("Chair".to_string()),
            price: Some("10".to_string()),
            image: Some(ImageUpload {
                content_type: "image/gif".to_string(),
                data: vec![0u8; 16],
            }),
            ..ProductInput::default()
        };

        let errors = validate_product(&input, true).unwrap_err();
        assert_eq!(
            errors["image"],
            vec!["The image must be a file of type: jpg, jpeg, png.".to_string()]
        );
    }

    #[test]
    fn test_product_rejects_oversized_image() {
        let input = ProductInput {
            name: Some("Chair".to_string()),
            price: Some("10".to_string()),
            image: Some(ImageUpload {
                content_type: "image/png".to_string(),
                data: vec![0u8; MAX_IMAGE_BYTES + 1],
            }),
            ..ProductInput::default()
        };

        let errors = validate_product(&input, true).unwrap_err();
        assert!(errors.contains_key("image"));
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(validate_quantity(1).is_empty());
        assert!(validate_quantity(5).is_empty());
        assert!(!validate_quantity(0).is_empty());
        assert!(!validate_quantity(-3).is_empty());
    }
}
