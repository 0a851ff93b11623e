use serde::Deserialize;

// Form payload for creating or updating a campground. All fields default
// so an empty body still reaches validation instead of a framework-level
// rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CampgroundForm {
    pub title: String,
    pub location: String,
    pub price: String,
    pub description: String,
    pub image_url: String,
}

// Validated campground fields.
#[derive(Debug, PartialEq)]
pub struct CampgroundInput {
    pub title: String,
    pub location: String,
    pub price: f64,
    pub description: String,
    pub image_url: String,
}

impl CampgroundForm {
    pub fn parse(&self) -> Result<CampgroundInput, &'static str> {
        let title = self.title.trim();
        let location = self.location.trim();
        if title.is_empty() || location.is_empty() {
            return Err("Invalid campground data");
        }

        let price: f64 = self
            .price
            .trim()
            .parse()
            .map_err(|_| "Invalid campground data")?;
        if !price.is_finite() || price < 0.0 {
            return Err("Invalid campground data");
        }

        Ok(CampgroundInput {
            title: title.to_string(),
            location: location.to_string(),
            price,
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
        })
    }
}

// Form payload for posting a review.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReviewForm {
    pub rating: String,
    pub body: String,
}

// Validated review fields.
#[derive(Debug, PartialEq)]
pub struct ReviewInput {
    pub rating: i32,
    pub body: String,
}

impl ReviewForm {
    pub fn parse(&self) -> Result<ReviewInput, &'static str> {
        let rating: i32 = self
            .rating
            .trim()
            .parse()
            .map_err(|_| "Invalid review data")?;
        if !(1..=5).contains(&rating) {
            return Err("Invalid review data");
        }

        let body = self.body.trim();
        if body.is_empty() {
            return Err("Invalid review data");
        }

        Ok(ReviewInput {
            rating,
            body: body.to_string(),
        })
    }
}

// Form payload for account creation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

// Form payload for credential login.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}
