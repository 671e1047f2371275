mod fixtures;
mod utils;

use fixtures::catalog::shirt_draft;
use storefront::catalog::{CatalogError, CatalogService};
use utils::{catalog_service, AnyHow};

#[cfg(test)]
pub mod create_test {
    use super::*;

    #[async_std::test]
    async fn resolves_attributes_and_creates_the_group() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        let product = service
            .create(&shirt_draft("Heavy Tee", "Red", Some("Classic Tee")))
            .await?;

        assert_eq!(product.category.name, "Male");
        assert_eq!(product.kind.name, "Shirt");
        assert_eq!(product.size.name, "M");
        assert_eq!(product.size.product_type_id, product.kind.id);
        assert_eq!(product.color.name, "Red");
        assert_eq!(product.product_group.slug, "classic-tee");
        Ok(())
    }

    #[async_std::test]
    async fn second_color_with_same_label_reuses_the_group() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        let red = service
            .create(&shirt_draft("Heavy Tee", "Red", Some("Classic Tee")))
            .await?;
        let blue = service
            .create(&shirt_draft("Heavy Tee", "Blue", Some("Classic Tee")))
            .await?;
        assert_eq!(red.product_group.id, blue.product_group.id);

        let listing = service.list().await?;
        assert_eq!(listing.len(), 1);
        let entry = &listing[0];
        assert_eq!(entry.available_colors.len(), 2);
        // members order by color name, so Blue leads and represents
        assert_eq!(entry.available_colors[0].name, "Blue");
        assert_eq!(entry.available_colors[1].name, "Red");
        assert_eq!(entry.product.id, blue.id);
        assert_eq!(entry.product.color.name, "Blue");
        Ok(())
    }

    #[async_std::test]
    async fn implicit_group_name_joins_existing_group() -> Result<(), AnyHow> {
        // a product name that slugs like an existing group silently joins
        // it, whether or not the two were meant to be related
        let service = catalog_service().await?;
        let first = service
            .create(&shirt_draft("Anything", "Red", Some("Classic Tee")))
            .await?;
        let second = service
            .create(&shirt_draft("Classic  Tee", "Blue", None))
            .await?;
        assert_eq!(first.product_group.id, second.product_group.id);
        Ok(())
    }

    #[async_std::test]
    async fn unknown_attribute_names_are_rejected() -> Result<(), AnyHow> {
        let service = catalog_service().await?;

        let mut draft = shirt_draft("Tee", "Red", None);
        draft.category = "Alien".to_string();
        assert_eq!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::NotFound("category", "Alien".to_string())
        );

        let mut draft = shirt_draft("Tee", "Red", None);
        draft.kind = "Hat".to_string();
        assert_eq!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::NotFound("type", "Hat".to_string())
        );

        let draft = shirt_draft("Tee", "Turquoise", None);
        assert_eq!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::NotFound("color", "Turquoise".to_string())
        );
        Ok(())
    }

    #[async_std::test]
    async fn size_must_belong_to_the_type() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        // `38` exists, but under Shoes
        let mut draft = shirt_draft("Tee", "Red", None);
        draft.size = "38".to_string();
        assert_eq!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::InvalidSize {
                size: "38".to_string(),
                kind: "Shirt".to_string(),
            }
        );
        Ok(())
    }

    #[async_std::test]
    async fn blank_names_and_negative_numbers_are_invalid() -> Result<(), AnyHow> {
        let service = catalog_service().await?;

        let draft = shirt_draft("   ", "Red", None);
        assert!(matches!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::InvalidInput(_)
        ));

        let mut draft = shirt_draft("Tee", "Red", None);
        draft.price = -1.0;
        assert!(matches!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::InvalidInput(_)
        ));

        let mut draft = shirt_draft("Tee", "Red", None);
        draft.stock = -5;
        assert!(matches!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::InvalidInput(_)
        ));

        // explicit label with no usable slug characters
        let draft = shirt_draft("Tee", "Red", Some("!!!"));
        assert!(matches!(
            service.create(&draft).await.unwrap_err(),
            CatalogError::InvalidInput(_)
        ));
        Ok(())
    }
}

#[cfg(test)]
pub mod read_test {
    use super::*;

    #[async_std::test]
    async fn read_by_id_and_missing_id() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        let created = service.create(&shirt_draft("Tee", "Red", None)).await?;

        let read = service.read(created.id).await?;
        assert_eq!(read.id, created.id);
        assert_eq!(read.color.name, "Red");
        assert_eq!(read.product_group.slug, "tee");

        let missing = created.id.wrapping_add(1);
        assert!(matches!(
            service.read(missing).await.unwrap_err(),
            CatalogError::NotFound(..)
        ));
        Ok(())
    }

    #[async_std::test]
    async fn variant_lookup_by_slug_and_color() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        let red = service
            .create(&shirt_draft("Tee", "Red", Some("Classic Tee")))
            .await?;
        service
            .create(&shirt_draft("Tee", "Blue", Some("Classic Tee")))
            .await?;

        let found = service.read_variant("classic-tee", "Red").await?;
        assert_eq!(found.id, red.id);

        assert!(matches!(
            service
                .read_variant("classic-tee", "Turquoise")
                .await
                .unwrap_err(),
            CatalogError::NotFound("color", _)
        ));
        assert!(matches!(
            service.read_variant("vanished", "Red").await.unwrap_err(),
            CatalogError::NotFound("group", _)
        ));
        // color and group both exist, but no member wears White
        assert!(matches!(
            service
                .read_variant("classic-tee", "White")
                .await
                .unwrap_err(),
            CatalogError::NotFound("product", _)
        ));
        Ok(())
    }

    #[async_std::test]
    async fn dependencies_cover_the_reference_catalogs() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        service
            .create(&shirt_draft("Tee", "Red", Some("Classic Tee")))
            .await?;
        service
            .create(&shirt_draft("Tee", "Blue", Some("Classic Tee")))
            .await?;

        let deps = service.dependencies().await?;
        assert!(deps.categories.iter().any(|c| c.name == "Male"));
        let shirt = deps
            .types
            .iter()
            .find(|t| t.name == "Shirt")
            .ok_or("missing the Shirt type")?;
        let size_names: Vec<&str> = shirt.sizes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(size_names, ["S", "M", "L"]);
        for color in ["Red", "Blue"] {
            assert!(deps.colors.iter().any(|c| c.name == color));
        }
        assert!(deps.groups.iter().any(|g| g.slug == "classic-tee"));
        Ok(())
    }
}

#[cfg(test)]
pub mod update_test {
    use super::*;

    #[async_std::test]
    async fn revalidates_and_reassigns_attributes() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        let created = service.create(&shirt_draft("Tee", "Red", None)).await?;

        let mut draft = shirt_draft("Renamed Tee", "Blue", None);
        draft.category = "Female".to_string();
        draft.size = "L".to_string();
        draft.price = 49.5;
        let updated = service.update(created.id, &draft).await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Renamed Tee");
        assert_eq!(updated.category.name, "Female");
        assert_eq!(updated.size.name, "L");
        assert_eq!(updated.color.name, "Blue");
        assert_eq!(updated.price, 49.5);
        // the group assignment never moves after create
        assert_eq!(updated.product_group.id, created.product_group.id);
        Ok(())
    }

    #[async_std::test]
    async fn update_rejects_bad_sizes_and_missing_ids() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        let created = service.create(&shirt_draft("Tee", "Red", None)).await?;

        let mut bad = shirt_draft("Tee", "Red", None);
        bad.size = "38".to_string();
        assert!(matches!(
            service.update(created.id, &bad).await.unwrap_err(),
            CatalogError::InvalidSize { .. }
        ));

        assert!(matches!(
            service
                .update(created.id.wrapping_add(1), &shirt_draft("Tee", "Red", None))
                .await
                .unwrap_err(),
            CatalogError::NotFound(..)
        ));
        Ok(())
    }
}

#[cfg(test)]
pub mod delete_test {
    use super::*;

    #[async_std::test]
    async fn delete_keeps_the_emptied_group_out_of_the_listing() -> Result<(), AnyHow> {
        let service = catalog_service().await?;
        let created = service
            .create(&shirt_draft("Tee", "Red", Some("Classic Tee")))
            .await?;

        service.delete(created.id).await?;
        assert!(matches!(
            service.delete(created.id).await.unwrap_err(),
            CatalogError::NotFound(..)
        ));
        assert!(service.list().await?.is_empty());

        // the group row itself persists for future variants
        let deps = service.dependencies().await?;
        assert!(deps.groups.iter().any(|g| g.slug == "classic-tee"));
        Ok(())
    }
}
