//! Server-rendered HTML views. Pages are assembled as strings through a
//! shared layout; the error view is plain string construction so the
//! terminal error handler cannot itself fail.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::domain::entities::{Campground, Review};
use crate::domain::errors::PageError;
use crate::interface_adapters::context::ViewContext;

// Terminal error handler: every PageError leaves the process as a
// rendered error view with a normalized status and message.
impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, message) = self.normalize();
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Html(render_error(status.as_u16(), message))).into_response()
    }
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(ctx: &ViewContext, title: &str, body: &str) -> String {
    let nav_account = match &ctx.current_user {
        Some(user) => format!(
            r#"<span class="nav-user">{}</span> <a href="/logout">Logout</a>"#,
            escape_html(&user.username)
        ),
        None => r#"<a href="/login">Login</a> <a href="/register">Register</a>"#.to_string(),
    };

    let mut flash_html = String::new();
    for flash in &ctx.flash {
        flash_html.push_str(&format!(
            r#"<div class="flash flash-{}">{}</div>"#,
            escape_html(&flash.kind),
            escape_html(&flash.message)
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title} | YelpCamp</title>
    <link rel="stylesheet" href="/public/stylesheets/app.css">
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/campgrounds">Campgrounds</a>
        <a href="/campgrounds/new">New Campground</a>
        <span class="nav-right">{nav_account}</span>
    </nav>
    {flash_html}
    <main>
{body}
    </main>
</body>
</html>"#,
        title = escape_html(title),
    )
}

pub fn render_home(ctx: &ViewContext) -> String {
    layout(
        ctx,
        "Home",
        r#"        <h1>YelpCamp</h1>
        <p>Find and review campgrounds.</p>
        <p><a href="/campgrounds">View campgrounds</a></p>"#,
    )
}

// The dedicated error view: receives only the normalized status and
// message, never raw error shapes.
pub fn render_error(status: u16, message: &str) -> String {
    let ctx = ViewContext::default();
    let body = format!(
        r#"        <h1 class="error-status">{status}</h1>
        <p class="error-message">{}</p>
        <p><a href="/campgrounds">Back to campgrounds</a></p>"#,
        escape_html(message)
    );
    layout(&ctx, "Error", &body)
}

pub fn render_campground_index(ctx: &ViewContext, campgrounds: &[Campground]) -> String {
    let mut items = String::new();
    for campground in campgrounds {
        items.push_str(&format!(
            r#"        <li class="campground">
            <a href="/campgrounds/{id}">{title}</a>
            <span class="location">{location}</span>
        </li>
"#,
            id = campground.id,
            title = escape_html(&campground.title),
            location = escape_html(&campground.location),
        ));
    }

    let body = format!(
        r#"        <h1>All Campgrounds</h1>
        <ul class="campgrounds">
{items}        </ul>"#
    );
    layout(ctx, "Campgrounds", &body)
}

pub fn render_campground_show(
    ctx: &ViewContext,
    campground: &Campground,
    reviews: &[Review],
) -> String {
    let viewer_id = ctx.current_user.as_ref().map(|u| u.id);

    let owner_controls = if viewer_id == Some(campground.author_id) {
        format!(
            r#"        <div class="owner-controls">
            <a href="/campgrounds/{id}/edit">Edit</a>
            <form method="post" action="/campgrounds/{id}?_method=DELETE">
                <button type="submit">Delete</button>
            </form>
        </div>
"#,
            id = campground.id
        )
    } else {
        String::new()
    };

    let image = if campground.image_url.is_empty() {
        String::new()
    } else {
        format!(
            r#"        <img src="{}" alt="{}">
"#,
            escape_html(&campground.image_url),
            escape_html(&campground.title)
        )
    };

    let mut review_html = String::new();
    for review in reviews {
        let delete_form = if viewer_id == Some(review.author_id) {
            format!(
                r#"            <form method="post"
                  action="/campgrounds/{}/reviews/{}?_method=DELETE">
                <button type="submit">Delete</button>
            </form>
"#,
                campground.id, review.id
            )
        } else {
            String::new()
        };

        review_html.push_str(&format!(
            r#"        <li class="review">
            <span class="rating">{} / 5</span>
            <span class="author">{}</span>
            <p>{}</p>
{delete_form}        </li>
"#,
            review.rating,
            escape_html(&review.author_username),
            escape_html(&review.body),
        ));
    }

    let review_form = if ctx.current_user.is_some() {
        format!(
            r#"        <form method="post" action="/campgrounds/{}/reviews" class="review-form">
            <label>Rating <input type="number" name="rating" min="1" max="5" value="5"></label>
            <label>Review <textarea name="body"></textarea></label>
            <button type="submit">Submit review</button>
        </form>
"#,
            campground.id
        )
    } else {
        r#"        <p><a href="/login">Log in</a> to leave a review.</p>
"#
        .to_string()
    };

    let body = format!(
        r#"        <h1>{title}</h1>
{image}        <p class="location">{location}</p>
        <p class="price">${price:.2}/night</p>
        <p class="author">Submitted by {author}</p>
        <p>{description}</p>
{owner_controls}        <h2>Reviews</h2>
        <ul class="reviews">
{review_html}        </ul>
{review_form}"#,
        title = escape_html(&campground.title),
        location = escape_html(&campground.location),
        price = campground.price,
        author = escape_html(&campground.author_username),
        description = escape_html(&campground.description),
    );
    layout(ctx, &campground.title, &body)
}

fn campground_fields(
    title: &str,
    location: &str,
    price: &str,
    description: &str,
    image_url: &str,
) -> String {
    format!(
        r#"            <label>Title <input type="text" name="title" value="{}"></label>
            <label>Location <input type="text" name="location" value="{}"></label>
            <label>Price <input type="text" name="price" value="{}"></label>
            <label>Description <textarea name="description">{}</textarea></label>
            <label>Image URL <input type="text" name="image_url" value="{}"></label>"#,
        escape_html(title),
        escape_html(location),
        escape_html(price),
        escape_html(description),
        escape_html(image_url),
    )
}

pub fn render_campground_new(ctx: &ViewContext) -> String {
    let body = format!(
        r#"        <h1>New Campground</h1>
        <form method="post" action="/campgrounds">
{}
            <button type="submit">Create campground</button>
        </form>"#,
        campground_fields("", "", "", "", ""),
    );
    layout(ctx, "New Campground", &body)
}

pub fn render_campground_edit(ctx: &ViewContext, campground: &Campground) -> String {
    let body = format!(
        r#"        <h1>Edit Campground</h1>
        <form method="post" action="/campgrounds/{id}?_method=PUT">
{fields}
            <button type="submit">Update campground</button>
        </form>"#,
        id = campground.id,
        fields = campground_fields(
            &campground.title,
            &campground.location,
            &format!("{}", campground.price),
            &campground.description,
            &campground.image_url,
        ),
    );
    layout(ctx, "Edit Campground", &body)
}

pub fn render_register(ctx: &ViewContext) -> String {
    layout(
        ctx,
        "Register",
        r#"        <h1>Register</h1>
        <form method="post" action="/register">
            <label>Username <input type="text" name="username"></label>
            <label>Email <input type="email" name="email"></label>
            <label>Password <input type="password" name="password"></label>
            <button type="submit">Sign up</button>
        </form>"#,
    )
}

pub fn render_login(ctx: &ViewContext) -> String {
    layout(
        ctx,
        "Login",
        r#"        <h1>Login</h1>
        <form method="post" action="/login">
            <label>Username <input type="text" name="username"></label>
            <label>Password <input type="password" name="password"></label>
            <button type="submit">Log in</button>
        </form>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FlashMessage;
    use crate::interface_adapters::context::CurrentUser;

    fn campground() -> Campground {
        Campground {
            id: 7,
            title: "Hilltop Hideout".to_string(),
            location: "Big Sur, CA".to_string(),
            price: 24.5,
            description: "Quiet site above the fog line.".to_string(),
            image_url: String::new(),
            author_id: 1,
            author_username: "camper".to_string(),
        }
    }

    #[test]
    fn when_text_is_escaped_then_markup_characters_are_neutralized() {
        assert_eq!(
            escape_html(r#"<b>&"'</b>"#),
            "&lt;b&gt;&amp;&quot;&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn when_error_view_renders_then_it_contains_status_and_message() {
        let html = render_error(404, "Page Not Found");
        assert!(html.contains("404"));
        assert!(html.contains("Page Not Found"));
    }

    #[test]
    fn when_error_message_contains_markup_then_it_is_escaped() {
        let html = render_error(500, "<script>alert(1)</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn when_flash_is_present_then_layout_renders_the_banner() {
        let ctx = ViewContext {
            current_user: None,
            flash: vec![FlashMessage::success("Welcome back!")],
        };
        let html = render_home(&ctx);
        assert!(html.contains("flash-success"));
        assert!(html.contains("Welcome back!"));
    }

    #[test]
    fn when_user_is_signed_in_then_nav_shows_username_and_logout() {
        let ctx = ViewContext {
            current_user: Some(CurrentUser {
                id: 1,
                username: "camper".to_string(),
            }),
            flash: Vec::new(),
        };
        let html = render_home(&ctx);
        assert!(html.contains("camper"));
        assert!(html.contains("/logout"));
    }

    #[test]
    fn when_viewer_is_the_author_then_show_page_offers_edit_and_delete() {
        let ctx = ViewContext {
            current_user: Some(CurrentUser {
                id: 1,
                username: "camper".to_string(),
            }),
            flash: Vec::new(),
        };
        let html = render_campground_show(&ctx, &campground(), &[]);
        assert!(html.contains("/campgrounds/7/edit"));
        assert!(html.contains("_method=DELETE"));
    }

    #[test]
    fn when_viewer_is_not_the_author_then_show_page_hides_owner_controls() {
        let ctx = ViewContext::default();
        let html = render_campground_show(&ctx, &campground(), &[]);
        assert!(!html.contains("/campgrounds/7/edit"));
    }

    #[test]
    fn when_campground_title_contains_markup_then_index_escapes_it() {
        let mut listing = campground();
        listing.title = "<img src=x onerror=alert(1)>".to_string();
        let html = render_campground_index(&ViewContext::default(), &[listing]);
        assert!(!html.contains("<img src=x"));
    }

    #[test]
    fn when_page_error_converts_to_response_then_status_is_normalized() {
        let response = PageError::internal().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
