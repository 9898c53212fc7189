// `MigrationTrait` methods take `&SchemaManager` with an elided lifetime;
// spelling it `<'_>` conflicts with the trait's desugared signature (E0195).
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_users_table::Migration),
            Box::new(m20240501_000002_create_warehouses_table::Migration),
        ]
    }
}

mod m20240501_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Password).string().not_null())
                        .col(
                            ColumnDef::new(Users::Role)
                                .string()
                                .not_null()
                                .default("user"),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Email,
        Name,
        Password,
        Role,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240501_000002_create_warehouses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000002_create_warehouses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::WarehouseId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Warehouses::WarehouseName).string().not_null())
                        .col(ColumnDef::new(Warehouses::Address1).string().not_null())
                        .col(ColumnDef::new(Warehouses::Address2).string())
                        .col(ColumnDef::new(Warehouses::AreaLocality).string().not_null())
                        .col(ColumnDef::new(Warehouses::State).string().not_null())
                        .col(ColumnDef::new(Warehouses::City).string().not_null())
                        .col(ColumnDef::new(Warehouses::Pincode).string().not_null())
                        .col(ColumnDef::new(Warehouses::Gstno).string())
                        .col(ColumnDef::new(Warehouses::TotalLotArea).double().not_null())
                        .col(ColumnDef::new(Warehouses::CoveredArea).double().not_null())
                        .col(ColumnDef::new(Warehouses::NoOfDocs).integer())
                        .col(ColumnDef::new(Warehouses::NoOfGate).integer())
                        .col(ColumnDef::new(Warehouses::StorageHeight).double())
                        .col(ColumnDef::new(Warehouses::ParkingArea).double())
                        .col(
                            ColumnDef::new(Warehouses::Status)
                                .string()
                                .not_null()
                                .default("unpublish"),
                        )
                        .col(ColumnDef::new(Warehouses::WarehouseImages).json().not_null())
                        .col(
                            ColumnDef::new(Warehouses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Warehouses::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Every read path filters on status; search filters on state/city.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_warehouses_status")
                        .table(Warehouses::Table)
                        .col(Warehouses::Status)
                        .to_owned(),
                )
                .await?;
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_warehouses_state_city")
                        .table(Warehouses::Table)
                        .col(Warehouses::State)
                        .col(Warehouses::City)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Warehouses {
        Table,
        Id,
        WarehouseId,
        WarehouseName,
        Address1,
        Address2,
        AreaLocality,
        State,
        City,
        Pincode,
        Gstno,
        TotalLotArea,
        CoveredArea,
        NoOfDocs,
        NoOfGate,
        StorageHeight,
        ParkingArea,
        Status,
        WarehouseImages,
        CreatedAt,
        UpdatedAt,
    }
}
