//! Two related models served through `OrmModelView`
//!
//! `Book.author` is a foreign key to `Author`, stored as `author_id`.

use reinhardt_admin_orm::prelude::*;
use serde_json::{Value, json};
use std::sync::{Arc, LazyLock};

pub struct Author;

static AUTHOR_META: LazyLock<ModelMeta> = LazyLock::new(|| {
	ModelMeta::new("library.Author")
		.field("id", OrmField::int().primary_key())
		.field("name", OrmField::char(80))
});

impl Model for Author {
	fn meta() -> &'static ModelMeta {
		&AUTHOR_META
	}
}

pub struct Book;

static BOOK_META: LazyLock<ModelMeta> = LazyLock::new(|| {
	ModelMeta::new("library.Book")
		.field("id", OrmField::int().primary_key())
		.field("title", OrmField::char(120))
		.field("summary", OrmField::text().null())
		.field("pages", OrmField::int().with_default())
		.field(
			"genre",
			OrmField::char_enum(vec![
				("fiction".into(), "Fiction".into()),
				("essay".into(), "Essay".into()),
			])
			.with_default(),
		)
		.field("in_print", OrmField::boolean().with_default())
		.field("published", OrmField::date().null())
		.field("author", OrmField::foreign_key("library.Author"))
});

impl Model for Book {
	fn meta() -> &'static ModelMeta {
		&BOOK_META
	}
}

fn record(value: Value) -> Record {
	match value {
		Value::Object(map) => map,
		_ => Record::new(),
	}
}

/// Library site without authentication, plus handles on both repositories.
pub struct Library {
	pub site: Arc<AdminSite>,
	pub authors: Arc<MemoryRepository>,
	pub books: Arc<MemoryRepository>,
}

/// Build the library site with three books by two authors.
pub fn library_site() -> Library {
	let authors = Arc::new(MemoryRepository::for_model(Author::meta()));
	authors.reset([
		record(json!({"id": 1, "name": "Frank Herbert"})),
		record(json!({"id": 2, "name": "Jane Austen"})),
	]);

	let books = Arc::new(MemoryRepository::for_model(Book::meta()));
	books.reset([
		record(json!({
			"id": 1, "title": "Dune", "summary": "Spice and sand",
			"pages": 412, "genre": "fiction", "in_print": true,
			"published": "1965-08-01", "author_id": 1
		})),
		record(json!({
			"id": 2, "title": "Emma", "summary": null,
			"pages": 474, "genre": "fiction", "in_print": true,
			"published": "1815-12-23", "author_id": 2
		})),
		record(json!({
			"id": 3, "title": "Dune Messiah", "summary": "The sequel",
			"pages": 256, "genre": "fiction", "in_print": false,
			"published": null, "author_id": 1
		})),
	]);

	let overrides = FieldOverrides::new()
		.field("title", FieldOverride::new().label("Title"))
		.field("summary", FieldOverride::new().exclude_from_list());

	let author_view = OrmModelView::<Author, _>::new(authors.clone())
		.expect("author fields map")
		.with_searchable_fields(["name"]);
	let book_view = OrmModelView::<Book, _>::with_overrides(books.clone(), &overrides)
		.expect("book fields map")
		.with_page_size(2)
		.with_searchable_fields(["title", "summary"]);

	let mut site = AdminSite::new(AdminSettings::default().with_title("Library"))
		.expect("default settings are valid");
	site.add_view(Arc::new(author_view)).expect("author identity is free");
	site.add_view(Arc::new(book_view)).expect("book identity is free");

	Library {
		site: Arc::new(site),
		authors,
		books,
	}
}
