macro_rules! tuple_impl {
    ($($c:ident),*) => {
        tuple_impl!([] [$($c)*]);
    };

    ([] []) => {
        impl crate::component::Bundle for () {
            fn write(self, _: &mut crate::component::BundleWriter<'_>) {}
        }

        // `ComponentQuery` is deliberately not implemented for `()`:
        // intersection queries require at least one component type
    };

    ([$head:ident $($c:ident)*] []) => {
        impl<$head, $($c),*> crate::component::Bundle for ($head, $($c,)*)
        where
            $head: crate::component::Component,
            $($c: crate::component::Component),*
        {
            #[allow(non_snake_case)]
            fn write(self, writer: &mut crate::component::BundleWriter<'_>) {
                let ($head, $($c,)*) = self;

                writer.write($head);
                $(writer.write($c);)*
            }
        }

        impl<$head, $($c),*> crate::component::ComponentQuery
            for ($head, $($c,)*)
        where
            $head: crate::component::Component,
            $($c: crate::component::Component),*
        {
            fn components(out: &mut Vec<crate::component::ComponentInfo>) {
                out.push(crate::component::ComponentInfo::of::<$head>());
                $(out.push(crate::component::ComponentInfo::of::<$c>());)*
            }
        }
    };

    ([$($rest:ident)*] [$head:ident $($tail:ident)*]) => {
        tuple_impl!([$($rest)*] []);
        tuple_impl!([$($rest)* $head] [$($tail)*]);
    };
}

tuple_impl!(
    C0, C1, C2, C3, C4, C5, C6, C7, C8, C9, C10, C11, C12, C13, C14, C15
);
