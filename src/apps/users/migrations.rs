//! Schema for the users app

use multiform_db::Migration;
use sea_query::{
	Alias, ColumnDef, ForeignKey, ForeignKeyAction, Index, SqliteQueryBuilder, Table,
};

use super::models::{PHONE_NAME_MAX_LENGTH, PHONE_NUMBER_MAX_LENGTH, USERNAME_MAX_LENGTH};

pub const USERS_TABLE: &str = "users";
pub const PHONES_TABLE: &str = "phones";

/// All migrations of the app, in application order
pub fn migrations() -> Vec<Migration> {
	vec![initial()]
}

fn initial() -> Migration {
	let users = Table::create()
		.table(Alias::new(USERS_TABLE))
		.if_not_exists()
		.col(
			ColumnDef::new(Alias::new("id"))
				.integer()
				.not_null()
				.auto_increment()
				.primary_key(),
		)
		.col(
			ColumnDef::new(Alias::new("username"))
				.string_len(USERNAME_MAX_LENGTH as u32)
				.not_null(),
		)
		.to_owned();

	let phones = Table::create()
		.table(Alias::new(PHONES_TABLE))
		.if_not_exists()
		.col(
			ColumnDef::new(Alias::new("id"))
				.integer()
				.not_null()
				.auto_increment()
				.primary_key(),
		)
		.col(ColumnDef::new(Alias::new("user_id")).integer().not_null())
		.col(
			ColumnDef::new(Alias::new("phone_number"))
				.string_len(PHONE_NUMBER_MAX_LENGTH as u32)
				.not_null(),
		)
		.col(
			ColumnDef::new(Alias::new("phone_name"))
				.string_len(PHONE_NAME_MAX_LENGTH as u32)
				.not_null()
				.default(""),
		)
		.foreign_key(
			ForeignKey::create()
				.name("fk_phones_user_id")
				.from(Alias::new(PHONES_TABLE), Alias::new("user_id"))
				.to(Alias::new(USERS_TABLE), Alias::new("id"))
				.on_delete(ForeignKeyAction::Cascade),
		)
		.to_owned();

	let phones_user_index = Index::create()
		.if_not_exists()
		.name("idx_phones_user_id")
		.table(Alias::new(PHONES_TABLE))
		.col(Alias::new("user_id"))
		.to_owned();

	let drop_phones = Table::drop()
		.table(Alias::new(PHONES_TABLE))
		.if_exists()
		.to_owned();
	let drop_users = Table::drop()
		.table(Alias::new(USERS_TABLE))
		.if_exists()
		.to_owned();

	Migration::new("0001_initial", "users")
		.add_operation(users.to_string(SqliteQueryBuilder))
		.add_operation(phones.to_string(SqliteQueryBuilder))
		.add_operation(phones_user_index.to_string(SqliteQueryBuilder))
		.add_reverse_operation(drop_phones.to_string(SqliteQueryBuilder))
		.add_reverse_operation(drop_users.to_string(SqliteQueryBuilder))
}
